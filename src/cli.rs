use crate::component::frame_extractor::{ExtractionOptions, MirrorBase};
use crate::config::{Config, VideoExtensionTable};
use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// 從資料夾內的影片批次擷取影格，並保留原本的資料夾結構
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// 要掃描影片的資料夾
    #[arg(short, long, required_unless_present = "write_settings")]
    pub path: Option<PathBuf>,

    /// 影格輸出資料夾（不存在時自動建立）
    #[arg(short, long, required_unless_present = "write_settings")]
    pub output: Option<PathBuf>,

    /// 平行處理的 worker 數量 [預設: 4]
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub num_processes: Option<u32>,

    /// 影片副檔名清單（逗號分隔），例如 mp4,avi,mkv
    #[arg(long)]
    pub extensions: Option<String>,

    /// 輸出目錄包含掃描資料夾本身的名稱
    #[arg(long)]
    pub include_root_name: bool,

    /// 任一影片失敗時以非零狀態結束
    #[arg(long)]
    pub fail_on_error: bool,

    /// 設定檔路徑 [預設: ./settings.json]
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// 將目前生效的設定寫入檔案後結束
    #[arg(long, value_name = "FILE")]
    pub write_settings: Option<PathBuf>,

    /// 不顯示進度條
    #[arg(long)]
    pub no_progress: bool,

    /// 輸出 debug 訊息
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令列參數優先於設定檔
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(num_processes) = self.num_processes {
            config.settings.num_processes = num_processes as usize;
        }
        if let Some(extensions) = &self.extensions {
            config.video_extension_table = VideoExtensionTable::from_list(extensions);
        }
    }

    pub fn extraction_options(&self, config: &Config) -> Result<ExtractionOptions> {
        let input_dir = self
            .path
            .clone()
            .ok_or_else(|| anyhow!("缺少 --path 參數"))?;
        let output_dir = self
            .output
            .clone()
            .ok_or_else(|| anyhow!("缺少 --output 參數"))?;

        let mirror_base = if self.include_root_name {
            MirrorBase::ScanRootParent
        } else {
            MirrorBase::ScanRoot
        };

        Ok(ExtractionOptions {
            input_dir,
            output_dir,
            num_processes: config.settings.num_processes.max(1),
            mirror_base,
            show_progress: !self.no_progress,
        })
    }
}
