use crate::config::VideoExtensionTable;
use anyhow::Result;
use log::warn;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 遞迴掃描目錄下的影片檔案
///
/// 每一層依檔名排序，因此相同的目錄樹每次都得到相同順序；重複路徑只保留第一次出現。
/// 不跟隨目錄連結（避免循環），但指向檔案的符號連結視為影片檔。
pub fn scan_video_files(
    directory: &Path,
    video_extension_table: &VideoExtensionTable,
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();

    let video_files = WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("掃描時略過無法讀取的項目: {e}");
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .filter(|entry| video_extension_table.is_video_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .filter(|path| seen.insert(path.clone()))
        .collect();

    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table() -> VideoExtensionTable {
        VideoExtensionTable::from_list("mp4,avi")
    }

    #[test]
    fn test_scan_counts_only_matching_files_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();

        for file in [
            "top.mp4",
            "a/one.avi",
            "a/b/two.MP4",
            "a/b/c/three.mp4",
            "notes.txt",
            "a/cover.jpg",
            "a/b/c/subtitle.srt",
        ] {
            fs::write(root.join(file), b"x").unwrap();
        }

        let videos = scan_video_files(root, &table()).unwrap();
        assert_eq!(videos.len(), 4);
        assert!(videos.iter().all(|p| p.starts_with(root)));
    }

    #[test]
    fn test_scan_order_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("cam2")).unwrap();
        fs::create_dir_all(root.join("cam1")).unwrap();
        for file in ["cam2/b.mp4", "cam1/z.mp4", "cam1/a.avi"] {
            fs::write(root.join(file), b"x").unwrap();
        }

        let first = scan_video_files(root, &table()).unwrap();
        let second = scan_video_files(root, &table()).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                root.join("cam1/a.avi"),
                root.join("cam1/z.mp4"),
                root.join("cam2/b.mp4"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_video_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("folder.mp4")).unwrap();
        fs::write(root.join("folder.mp4/real.mp4"), b"x").unwrap();

        let videos = scan_video_files(root, &table()).unwrap();
        assert_eq!(videos, vec![root.join("folder.mp4/real.mp4")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_video_is_discovered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("in");
        let store = temp_dir.path().join("store");
        fs::create_dir_all(root.join("cam1")).unwrap();
        fs::create_dir_all(&store).unwrap();
        fs::write(root.join("cam1/plain.mp4"), b"x").unwrap();
        fs::write(store.join("clip.mp4"), b"x").unwrap();
        std::os::unix::fs::symlink(store.join("clip.mp4"), root.join("cam1/linked.mp4")).unwrap();
        // 指向目錄的連結不展開
        std::os::unix::fs::symlink(&store, root.join("store_link")).unwrap();

        let videos = scan_video_files(&root, &table()).unwrap();
        assert_eq!(
            videos,
            vec![root.join("cam1/linked.mp4"), root.join("cam1/plain.mp4")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("missing.mp4"), root.join("broken.mp4")).unwrap();

        assert!(scan_video_files(root, &table()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let videos = scan_video_files(temp_dir.path(), &table()).unwrap();
        assert!(videos.is_empty());
    }
}
