use crate::config::{DEFAULT_FALLBACK_FPS, ExtractorSettings};
use anyhow::{Context, Result, bail};
use log::warn;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// 以 ffprobe 讀取容器 metadata 取得幀率，失敗時退回固定值
#[derive(Debug, Clone)]
pub struct FpsProber {
    ffprobe_path: String,
    fallback_fps: u32,
}

impl Default for FpsProber {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            fallback_fps: DEFAULT_FALLBACK_FPS,
        }
    }
}

impl FpsProber {
    #[must_use]
    pub fn new(settings: &ExtractorSettings) -> Self {
        Self {
            ffprobe_path: settings.ffprobe_path.clone(),
            fallback_fps: settings.fallback_fps,
        }
    }

    /// 取得整數 FPS，永不失敗
    ///
    /// 幀率取整數部分（24.97 -> 24）。無法開啟、沒有視訊串流、或幀率不為正時，
    /// 記錄警告並回傳 `fallback_fps`。
    #[must_use]
    pub fn probe_fps(&self, path: &Path) -> u32 {
        match read_frame_rate(&self.ffprobe_path, path) {
            Ok(rate) => fps_or_fallback(Some(rate), self.fallback_fps).unwrap_or_else(|fallback| {
                warn!(
                    "{} 的幀率無效 ({rate})，使用預設 FPS {fallback}",
                    path.display()
                );
                fallback
            }),
            Err(e) => {
                warn!(
                    "無法取得 {} 的 FPS，使用預設 FPS {}: {e:#}",
                    path.display(),
                    self.fallback_fps
                );
                self.fallback_fps
            }
        }
    }
}

/// 只讀 metadata，不解碼畫面
///
/// `output()` 會等待子程序結束，因此任何結果下 ffprobe 都已回收。
fn read_frame_rate(ffprobe_path: &str, path: &Path) -> Result<f64> {
    let output = Command::new(ffprobe_path)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-print_format",
            "json",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    frame_rate_from_json(&stdout)
}

fn frame_rate_from_json(json: &str) -> Result<f64> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).with_context(|| "無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow::anyhow!("找不到視訊串流"))?;

    // 優先使用平均幀率，其次為 r_frame_rate
    video_stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .filter(|rate| *rate > 0.0)
        .or_else(|| video_stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| anyhow::anyhow!("找不到幀率資訊"))
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}

/// 幀率取整；結果不為正時回傳 `Err(fallback)`
fn fps_or_fallback(rate: Option<f64>, fallback: u32) -> std::result::Result<u32, u32> {
    match rate {
        Some(rate) if rate.is_finite() && rate >= 1.0 => Ok(rate.trunc() as u32),
        _ => Err(fallback),
    }
}
