use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

/// 輸出目錄要鏡像的相對路徑起點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorBase {
    /// `scan_root/a/b/v.mp4` -> `output_root/a/b`
    #[default]
    ScanRoot,
    /// `scan_root/a/b/v.mp4` -> `output_root/<scan_root 名稱>/a/b`
    ScanRootParent,
}

/// 單一影片的輸出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub directory: PathBuf,
    pub file_stem: String,
}

impl OutputLocation {
    /// ffmpeg 輸出樣式 `{file_stem}_%06d.jpg`
    ///
    /// 檔名中的 `%` 需寫成 `%%`，image2 才會當作一般字元。
    #[must_use]
    pub fn frame_pattern(&self) -> PathBuf {
        let escaped_stem = self.file_stem.replace('%', "%%");
        self.directory.join(format!("{escaped_stem}_%06d.jpg"))
    }

    /// 第 `index` 張（1 起算）影格的檔名
    #[must_use]
    pub fn frame_file_name(&self, index: usize) -> String {
        format!("{}_{index:06}.jpg", self.file_stem)
    }

    /// 是否為本影片輸出的影格檔（`{file_stem}_` 後面恰好六位數字）
    #[must_use]
    pub fn is_frame_file(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.file_stem.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .is_some_and(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// 依影片在掃描根目錄下的位置，計算鏡像後的輸出目錄
///
/// 不同資料夾中的同名影片會得到不同的輸出目錄，平行寫入時不會互相覆蓋。
pub fn map_output(
    source_path: &Path,
    scan_root: &Path,
    output_root: &Path,
    mirror_base: MirrorBase,
) -> Result<OutputLocation> {
    let base = match mirror_base {
        MirrorBase::ScanRoot => scan_root,
        MirrorBase::ScanRootParent => scan_root.parent().unwrap_or(scan_root),
    };

    let relative = source_path.strip_prefix(base).map_err(|_| {
        anyhow!(
            "路徑對應違反約定: {} 不在掃描根目錄 {} 之下",
            source_path.display(),
            base.display()
        )
    })?;

    let directory = relative
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| output_root.to_path_buf(), |parent| output_root.join(parent));

    let file_stem = source_path
        .file_stem()
        .ok_or_else(|| anyhow!("無效的檔名: {}", source_path.display()))?
        .to_string_lossy()
        .into_owned();

    Ok(OutputLocation {
        directory,
        file_stem,
    })
}
