use super::task_runner::{TaskOutcome, TaskRunner, VideoTask};
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, unbounded};
use indicatif::ProgressBar;
use log::error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 固定大小的 worker pool，每個 worker 一次處理一部影片
pub struct TaskScheduler {
    pool: rayon::ThreadPool,
    runner: Arc<TaskRunner>,
}

/// 已送出、尚未收齊結果的一批任務
pub struct DispatchedBatch {
    source_paths: Vec<PathBuf>,
    receiver: Receiver<(usize, TaskOutcome)>,
}

impl TaskScheduler {
    pub fn new(num_workers: usize, runner: TaskRunner) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers.max(1))
            .thread_name(|index| format!("frame-worker-{index}"))
            .panic_handler(|_| error!("worker 執行緒發生未預期的 panic"))
            .build()
            .context("無法建立 worker pool")?;

        Ok(Self {
            pool,
            runner: Arc::new(runner),
        })
    }

    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// 依掃描順序送出所有任務（FIFO），不等待完成
    #[must_use]
    pub fn dispatch(&self, tasks: Vec<VideoTask>, scan_root: &Path) -> DispatchedBatch {
        let (sender, receiver) = unbounded();
        let source_paths = tasks.iter().map(|t| t.source_path.clone()).collect();
        let scan_root = Arc::new(scan_root.to_path_buf());

        for (index, task) in tasks.into_iter().enumerate() {
            let sender = sender.clone();
            let runner = Arc::clone(&self.runner);
            let scan_root = Arc::clone(&scan_root);

            self.pool.spawn_fifo(move || {
                let outcome = runner.run(&task, &scan_root);
                // 接收端只會在 drain 結束後關閉
                let _ = sender.send((index, outcome));
            });
        }

        DispatchedBatch {
            source_paths,
            receiver,
        }
    }
}

impl DispatchedBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_paths.is_empty()
    }

    /// 阻塞直到每個任務都回報結果，結果依送出順序排列
    #[must_use]
    pub fn drain(self, progress_bar: &ProgressBar) -> Vec<TaskOutcome> {
        let mut outcomes: Vec<Option<TaskOutcome>> = vec![None; self.source_paths.len()];

        // 所有 sender 都結束後 iter 才會停止
        for (index, outcome) in self.receiver.iter() {
            if let TaskOutcome::Failed { source_path, .. } = &outcome {
                progress_bar.set_message(format!("失敗: {}", source_path.display()));
            }
            outcomes[index] = Some(outcome);
            progress_bar.inc(1);
        }

        outcomes
            .into_iter()
            .zip(self.source_paths)
            .map(|(outcome, source_path)| {
                outcome.unwrap_or_else(|| {
                    error!("worker 未回報結果: {}", source_path.display());
                    TaskOutcome::Failed {
                        source_path,
                        error_message: "worker 未回報結果".to_string(),
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::frame_extractor::MirrorBase;
    use crate::config::ExtractorSettings;
    use tempfile::TempDir;

    #[test]
    fn test_every_dispatched_task_reports_once() {
        let temp_dir = TempDir::new().unwrap();
        let scan_root = temp_dir.path().join("in");
        let output_root = temp_dir.path().join("out");
        let settings = ExtractorSettings {
            ffmpeg_path: "/nonexistent/ffmpeg".to_string(),
            ffprobe_path: "/nonexistent/ffprobe".to_string(),
            ..ExtractorSettings::default()
        };

        let scheduler =
            TaskScheduler::new(3, TaskRunner::new(&settings, MirrorBase::ScanRoot)).unwrap();
        assert_eq!(scheduler.num_workers(), 3);

        let tasks: Vec<VideoTask> = (0..10)
            .map(|i| VideoTask::new(scan_root.join(format!("dir{i}/v{i}.mp4")), &output_root))
            .collect();
        let expected: Vec<PathBuf> = tasks.iter().map(|t| t.source_path.clone()).collect();

        let batch = scheduler.dispatch(tasks, &scan_root);
        assert_eq!(batch.len(), 10);

        let progress_bar = ProgressBar::hidden();
        let outcomes = batch.drain(&progress_bar);

        assert_eq!(progress_bar.position(), 10);
        assert_eq!(
            outcomes
                .iter()
                .map(|o| o.source_path().to_path_buf())
                .collect::<Vec<_>>(),
            expected
        );
        assert!(outcomes.iter().all(|o| !o.is_success()));
    }

    #[test]
    fn test_zero_workers_is_clamped_to_one() {
        let scheduler = TaskScheduler::new(
            0,
            TaskRunner::new(&ExtractorSettings::default(), MirrorBase::ScanRoot),
        )
        .unwrap();
        assert_eq!(scheduler.num_workers(), 1);
    }

    #[test]
    fn test_empty_batch_drains_immediately() {
        let scheduler = TaskScheduler::new(
            2,
            TaskRunner::new(&ExtractorSettings::default(), MirrorBase::ScanRoot),
        )
        .unwrap();
        let batch = scheduler.dispatch(Vec::new(), Path::new("/in"));
        assert!(batch.is_empty());
        assert!(batch.drain(&ProgressBar::hidden()).is_empty());
    }
}
