use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 建立目錄（含中間層）；已存在時不視為錯誤
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("無法建立資料夾: {}", path.display()))
}

/// 轉為絕對路徑並解析符號連結
pub fn absolute_directory(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("無法解析路徑: {}", path.display()))
}
