use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 抓不到幀率時使用的預設值
pub const DEFAULT_FALLBACK_FPS: u32 = 30;
/// 預設 worker 數量
pub const DEFAULT_NUM_PROCESSES: usize = 4;
/// ffmpeg `-q:v` 品質（1-31，數字越小品質越高）
pub const DEFAULT_JPEG_QUALITY: u8 = 2;

const MIN_JPEG_QUALITY: u8 = 1;
const MAX_JPEG_QUALITY: u8 = 31;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoExtensionTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl VideoExtensionTable {
    /// 由逗號分隔的副檔名清單建立（例如 `mp4,avi,.MKV`）
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        let video_file = list
            .split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext.trim_start_matches('.').to_lowercase()))
            .collect();
        Self { video_file }
    }

    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 使用者設定（settings.json），所有欄位皆可省略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub jpeg_quality: u8,
    pub fallback_fps: u32,
    pub num_processes: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            fallback_fps: DEFAULT_FALLBACK_FPS,
            num_processes: DEFAULT_NUM_PROCESSES,
        }
    }
}

impl ExtractorSettings {
    /// 限制在 ffmpeg 可接受的 1-31 範圍
    #[must_use]
    pub fn clamped_quality(&self) -> u8 {
        self.jpeg_quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub video_extension_table: VideoExtensionTable,
    pub settings: ExtractorSettings,
}
