use super::path_mapper::OutputLocation;
use crate::config::{DEFAULT_JPEG_QUALITY, ExtractorSettings};
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 以 ffmpeg 將單一影片拆成 JPEG 影格序列
pub struct FrameExtractCommand {
    ffmpeg_path: String,
    source_path: PathBuf,
    location: OutputLocation,
    fps: u32,
    quality: u8,
}

impl FrameExtractCommand {
    #[must_use]
    pub fn new(source_path: &Path, location: OutputLocation, fps: u32) -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            source_path: source_path.to_path_buf(),
            location,
            fps,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: &ExtractorSettings) -> Self {
        self.ffmpeg_path.clone_from(&settings.ffmpeg_path);
        self.quality = settings.clamped_quality();
        self
    }

    #[must_use]
    pub const fn location(&self) -> &OutputLocation {
        &self.location
    }

    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.source_path.clone().into_os_string());
        args.extend(
            [
                "-r".to_string(),
                self.fps.to_string(),
                "-q:v".to_string(),
                self.quality.to_string(),
                "-f".to_string(),
                "image2".to_string(),
                "-y".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(self.location.frame_pattern().into_os_string());
        args
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(self.args());
        cmd.stdin(Stdio::null());
        cmd
    }

    /// 建立輸出目錄並執行 ffmpeg，直到程序結束才返回
    ///
    /// 回傳輸出目錄中屬於此影片的影格數量。
    pub fn extract(&self) -> Result<usize> {
        ensure_directory_exists(&self.location.directory)?;

        debug!(
            "執行影格擷取: {} {}",
            self.ffmpeg_path,
            self.args()
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = self
            .build_command()
            .output()
            .with_context(|| format!("無法執行 ffmpeg: {}", self.source_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg 擷取失敗 ({}): {}", output.status, stderr.trim());
        }

        // -loglevel error 下仍有輸出代表解碼過程有非致命錯誤
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(
                "ffmpeg 擷取 {} 時回報錯誤: {}",
                self.source_path.display(),
                stderr.trim()
            );
        }

        count_frames(&self.location)
    }
}

/// 計算輸出目錄中符合 `{file_stem}_NNNNNN.jpg` 的檔案數
pub fn count_frames(location: &OutputLocation) -> Result<usize> {
    let entries = fs::read_dir(&location.directory)
        .with_context(|| format!("無法讀取輸出資料夾: {}", location.directory.display()))?;

    Ok(entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| location.is_frame_file(&entry.file_name().to_string_lossy()))
        .count())
}
