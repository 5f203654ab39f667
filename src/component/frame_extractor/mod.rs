//! 批次影格擷取元件
//!
//! 每部影片為一個任務：
//! A. 取得 FPS（ffprobe，失敗時使用預設值）
//! B. 計算鏡像輸出目錄
//! C. 以 ffmpeg 輸出 `{檔名}_%06d.jpg`
//!
//! 任務在固定大小的 worker pool 中平行執行，單一任務失敗不影響其他任務。

mod ffmpeg_command;
mod main;
mod path_mapper;
mod task_runner;
mod task_scheduler;

pub use ffmpeg_command::{FrameExtractCommand, count_frames};
pub use main::{BatchFrameExtractor, ExtractionOptions, RunPhase, RunSummary};
pub use path_mapper::{MirrorBase, OutputLocation, map_output};
pub use task_runner::{TaskOutcome, TaskRunner, VideoTask};
pub use task_scheduler::{DispatchedBatch, TaskScheduler};
