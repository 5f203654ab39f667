use super::ffmpeg_command::FrameExtractCommand;
use super::path_mapper::{MirrorBase, map_output};
use crate::config::ExtractorSettings;
use crate::tools::FpsProber;
use anyhow::{Context, Result};
use log::{error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// 單一影片的擷取任務
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTask {
    pub source_path: PathBuf,
    pub output_root: PathBuf,
}

impl VideoTask {
    #[must_use]
    pub fn new(source_path: PathBuf, output_root: &Path) -> Self {
        Self {
            source_path,
            output_root: output_root.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed {
        source_path: PathBuf,
        output_directory: PathBuf,
        fps: u32,
        frames: usize,
    },
    Failed {
        source_path: PathBuf,
        error_message: String,
    },
}

impl TaskOutcome {
    #[must_use]
    pub fn source_path(&self) -> &Path {
        match self {
            Self::Completed { source_path, .. } | Self::Failed { source_path, .. } => source_path,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// 探測 FPS -> 計算輸出位置 -> 執行 ffmpeg
///
/// 所有錯誤（包含 panic）都在這一層轉為 `TaskOutcome::Failed`，不會影響其他任務。
#[derive(Debug, Clone)]
pub struct TaskRunner {
    prober: FpsProber,
    settings: ExtractorSettings,
    mirror_base: MirrorBase,
}

impl TaskRunner {
    #[must_use]
    pub fn new(settings: &ExtractorSettings, mirror_base: MirrorBase) -> Self {
        Self {
            prober: FpsProber::new(settings),
            settings: settings.clone(),
            mirror_base,
        }
    }

    #[must_use]
    pub fn run(&self, task: &VideoTask, scan_root: &Path) -> TaskOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run_inner(task, scan_root)));

        let error_message = match result {
            Ok(Ok(outcome)) => return outcome,
            Ok(Err(e)) => format!("{e:#}"),
            Err(payload) => format!("處理時發生 panic: {}", panic_message(payload.as_ref())),
        };

        error!(
            "處理影片失敗 {}: {error_message}",
            task.source_path.display()
        );

        TaskOutcome::Failed {
            source_path: task.source_path.clone(),
            error_message,
        }
    }

    fn run_inner(&self, task: &VideoTask, scan_root: &Path) -> Result<TaskOutcome> {
        let fps = self.prober.probe_fps(&task.source_path);
        info!("偵測到 {} 的 FPS: {fps}", task.source_path.display());

        let location = map_output(
            &task.source_path,
            scan_root,
            &task.output_root,
            self.mirror_base,
        )
        .context("掃描結果與掃描根目錄不一致（掃描邏輯錯誤）")?;

        let command =
            FrameExtractCommand::new(&task.source_path, location, fps).with_settings(&self.settings);
        let frames = command.extract()?;

        let output_directory = command.location().directory.clone();
        info!(
            "已擷取 {} 的 {frames} 張影格至 {}",
            task.source_path.display(),
            output_directory.display()
        );

        Ok(TaskOutcome::Completed {
            source_path: task.source_path.clone(),
            output_directory,
            fps,
            frames,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "未知錯誤".to_string())
}
