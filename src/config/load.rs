use crate::config::types::{Config, ExtractorSettings, VideoExtensionTable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 編譯時嵌入的影片副檔名設定（不需要外部檔案）
const VIDEO_EXTENSION_TABLE_JSON: &str = include_str!("../data/video_extension_table.json");

/// 未指定 `--settings` 時讀取的預設位置
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

impl Config {
    /// 載入設定；`settings_path` 為 `None` 時讀取工作目錄下的 settings.json（若存在）
    pub fn load(settings_path: Option<&Path>) -> Result<Self> {
        let video_extension_table = Self::load_embedded_extension_table()?;
        let settings = match settings_path {
            Some(path) => Self::load_settings(path)?,
            None => Self::load_settings(Path::new(DEFAULT_SETTINGS_PATH))?,
        };

        Ok(Self {
            video_extension_table,
            settings,
        })
    }

    fn load_settings(path: &Path) -> Result<ExtractorSettings> {
        if !path.exists() {
            return Ok(ExtractorSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// 從編譯時嵌入的 JSON 載入影片副檔名表
    fn load_embedded_extension_table() -> Result<VideoExtensionTable> {
        serde_json::from_str(VIDEO_EXTENSION_TABLE_JSON).context("無法解析嵌入的影片副檔名設定")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_table_contains_mp4_and_avi() {
        let table = Config::load_embedded_extension_table().unwrap();
        assert!(table.is_video_file(Path::new("a.mp4")));
        assert!(table.is_video_file(Path::new("a.avi")));
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(Some(&temp_dir.path().join("missing.json"))).unwrap();
        assert_eq!(config.settings, ExtractorSettings::default());
    }

    #[test]
    fn test_partial_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{ "ffmpeg_path": "/opt/ffmpeg/bin/ffmpeg", "num_processes": 8 }"#)
            .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.settings.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.settings.num_processes, 8);
        assert_eq!(config.settings.ffprobe_path, "ffprobe");
        assert_eq!(config.settings.fallback_fps, 30);
    }

    #[test]
    fn test_malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
