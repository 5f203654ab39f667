use super::path_mapper::MirrorBase;
use super::task_runner::{TaskOutcome, TaskRunner, VideoTask};
use super::task_scheduler::TaskScheduler;
use crate::config::Config;
use crate::tools::{
    absolute_directory, ensure_directory_exists, scan_video_files, validate_directory_exists,
};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;

/// 批次流程的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Discovering,
    Dispatching,
    Draining,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub num_processes: usize,
    pub mirror_base: MirrorBase,
    pub show_progress: bool,
}

/// 批次擷取結果
#[derive(Debug)]
pub struct RunSummary {
    pub phase: RunPhase,
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                TaskOutcome::Completed { frames, .. } => *frames,
                TaskOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// 批次影格擷取
///
/// 流程：
/// 1. 遞迴掃描輸入資料夾中的影片
/// 2. 依掃描順序送入固定大小的 worker pool
/// 3. 等待全部完成並更新進度
/// 4. 輸出摘要
///
/// 單一影片失敗只會記錄在摘要中，不會中止整批。
pub struct BatchFrameExtractor {
    config: Config,
    options: ExtractionOptions,
}

impl BatchFrameExtractor {
    #[must_use]
    pub const fn new(config: Config, options: ExtractionOptions) -> Self {
        Self { config, options }
    }

    pub fn run(&self) -> Result<RunSummary> {
        let mut phase = RunPhase::Idle;

        validate_directory_exists(&self.options.input_dir)?;
        let scan_root = absolute_directory(&self.options.input_dir)?;

        ensure_directory_exists(&self.options.output_dir)?;
        let output_root = absolute_directory(&self.options.output_dir)?;
        info!("輸出資料夾: {}", output_root.display());

        transition(&mut phase, RunPhase::Discovering);
        let video_files = scan_video_files(&scan_root, &self.config.video_extension_table)?;

        if video_files.is_empty() {
            warn!("在指定路徑中找不到任何影片檔案: {}", scan_root.display());
            transition(&mut phase, RunPhase::Done);
            return Ok(RunSummary {
                phase,
                outcomes: Vec::new(),
            });
        }

        info!(
            "找到 {} 個影片檔案，開始擷取影格...",
            video_files.len()
        );

        transition(&mut phase, RunPhase::Dispatching);
        let tasks: Vec<VideoTask> = video_files
            .into_iter()
            .map(|path| VideoTask::new(path, &output_root))
            .collect();

        let runner = TaskRunner::new(&self.config.settings, self.options.mirror_base);
        let scheduler = TaskScheduler::new(self.options.num_processes, runner)?;
        let batch = scheduler.dispatch(tasks, &scan_root);

        transition(&mut phase, RunPhase::Draining);
        let progress_bar = self.create_progress_bar(batch.len() as u64);
        let outcomes = batch.drain(&progress_bar);
        progress_bar.finish_with_message("完成");

        transition(&mut phase, RunPhase::Done);
        let summary = RunSummary { phase, outcomes };
        self.print_summary(&summary);
        info!("影格擷取完成！");

        Ok(summary)
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        if let Ok(progress_style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            progress_bar.set_style(progress_style.progress_chars("#>-"));
        }
        progress_bar.set_message("處理影片中...");
        progress_bar
    }

    fn print_summary(&self, summary: &RunSummary) {
        println!();
        println!("{}", style("=== 影格擷取摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", summary.total());
        println!("  成功: {} 個", style(summary.succeeded()).green());
        println!("  影格: {} 張", summary.total_frames());

        if summary.failed() > 0 {
            println!("  失敗: {} 個", style(summary.failed()).red());
            for outcome in &summary.outcomes {
                if let TaskOutcome::Failed { source_path, .. } = outcome {
                    println!("    - {}", source_path.display());
                }
            }
        }

        info!(
            "擷取任務完成 - 成功: {}, 失敗: {}",
            summary.succeeded(),
            summary.failed()
        );
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    debug!("階段轉換: {phase} -> {next}");
    *phase = next;
}
