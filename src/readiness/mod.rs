//! Readiness checks: is a batch safe to move?
//!
//! A batch is ready when no file is held open for writing, none has a
//! `.part`/`.partial` or `.incomplete`/`.!qB` sibling marker, and no file size
//! changes across one batch-wide stability window. Readiness is evaluated once
//! per run; the caller decides whether to retry the whole pipeline later.

pub mod handles;

use crate::batch::MediaBatch;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sibling suffixes left by downloaders for partially fetched files.
const PARTIAL_SUFFIXES: &[&str] = &["part", "partial"];

/// Sibling suffixes left by downloaders for files still in progress.
const INCOMPLETE_SUFFIXES: &[&str] = &["incomplete", "!qB"];

/// Why a batch is not ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotReadyReason {
    /// The batch has no files.
    EmptyBatch,
    /// Some process holds the file open with write access.
    OpenByWriter,
    /// A partial-download marker sits next to the file.
    PartialMarker(PathBuf),
    /// An incomplete-download marker sits next to the file.
    IncompleteMarker(PathBuf),
    /// The file grew or shrank during the stability window.
    SizeUnstable { before: u64, after: u64 },
    /// The file disappeared or became unreadable.
    Vanished,
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "no media files"),
            Self::OpenByWriter => write!(f, "open by writer"),
            Self::PartialMarker(marker) => write!(f, "partial marker {}", marker.display()),
            Self::IncompleteMarker(marker) => {
                write!(f, "incomplete marker {}", marker.display())
            }
            Self::SizeUnstable { before, after } => {
                write!(f, "size unstable ({} -> {} bytes)", before, after)
            }
            Self::Vanished => write!(f, "file vanished"),
        }
    }
}

/// Outcome of a readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessVerdict {
    Ready,
    NotReady {
        /// The first offending file, when there is one.
        file: Option<PathBuf>,
        reason: NotReadyReason,
    },
}

impl ReadinessVerdict {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    fn not_ready(file: &Path, reason: NotReadyReason) -> Self {
        Self::NotReady {
            file: Some(file.to_path_buf()),
            reason,
        }
    }

    /// Convert into the pipeline error taxonomy.
    pub fn into_result(self, batch: &MediaBatch) -> postdrop_common::Result<()> {
        match self {
            Self::Ready => Ok(()),
            Self::NotReady {
                reason: NotReadyReason::EmptyBatch,
                ..
            } => Err(postdrop_common::Error::EmptyBatch {
                path: batch.source().to_path_buf(),
            }),
            Self::NotReady { file, reason } => Err(postdrop_common::Error::not_ready(
                file.unwrap_or_else(|| batch.source().to_path_buf()),
                reason.to_string(),
            )),
        }
    }
}

/// Checks a batch against a stability window.
#[derive(Debug, Clone)]
pub struct ReadinessChecker {
    stability_window: Duration,
}

impl ReadinessChecker {
    pub fn new(stability_window: Duration) -> Self {
        Self { stability_window }
    }

    /// Run every check against `batch`.
    ///
    /// Cheap per-file checks run first and stop at the first failure. Only
    /// when all pass does the single batch-wide sleep happen.
    pub async fn check(&self, batch: &MediaBatch) -> ReadinessVerdict {
        if batch.is_empty() {
            tracing::warn!("Readiness check on empty batch: {:?}", batch.source());
            return ReadinessVerdict::NotReady {
                file: None,
                reason: NotReadyReason::EmptyBatch,
            };
        }

        for file in batch.files() {
            if let Some(reason) = quick_check(file) {
                tracing::info!(file = %file.display(), %reason, "File not ready");
                return ReadinessVerdict::not_ready(file, reason);
            }
        }

        let before: Vec<Option<u64>> = batch.files().iter().map(|f| file_size(f)).collect();

        tracing::debug!(
            "Waiting {:?} to confirm {} file sizes are stable",
            self.stability_window,
            batch.len()
        );
        tokio::time::sleep(self.stability_window).await;

        for (file, before) in batch.files().iter().zip(before) {
            let after = file_size(file);
            match (before, after) {
                (Some(before), Some(after)) if before == after => {}
                (Some(before), Some(after)) => {
                    let reason = NotReadyReason::SizeUnstable { before, after };
                    tracing::info!(file = %file.display(), %reason, "File not ready");
                    return ReadinessVerdict::not_ready(file, reason);
                }
                _ => {
                    tracing::info!(file = %file.display(), "File vanished during stability check");
                    return ReadinessVerdict::not_ready(file, NotReadyReason::Vanished);
                }
            }
        }

        tracing::info!("All {} files ready", batch.len());
        ReadinessVerdict::Ready
    }
}

/// Check a batch with the given stability window.
pub async fn check_ready(batch: &MediaBatch, stability_window: Duration) -> ReadinessVerdict {
    ReadinessChecker::new(stability_window).check(batch).await
}

fn quick_check(file: &Path) -> Option<NotReadyReason> {
    if handles::open_for_writing(file) {
        return Some(NotReadyReason::OpenByWriter);
    }
    if let Some(marker) = find_marker(file, PARTIAL_SUFFIXES) {
        return Some(NotReadyReason::PartialMarker(marker));
    }
    if let Some(marker) = find_marker(file, INCOMPLETE_SUFFIXES) {
        return Some(NotReadyReason::IncompleteMarker(marker));
    }
    None
}

fn find_marker(file: &Path, suffixes: &[&str]) -> Option<PathBuf> {
    suffixes.iter().find_map(|suffix| {
        let mut name: OsString = file.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        let marker = PathBuf::from(name);
        marker.exists().then_some(marker)
    })
}

fn file_size(file: &Path) -> Option<u64> {
    std::fs::metadata(file).ok().map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn batch_with(dir: &Path, names: &[&str]) -> MediaBatch {
        let files = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"video data").unwrap();
                path
            })
            .collect();
        MediaBatch::from_files(dir, files)
    }

    #[tokio::test]
    async fn test_stable_files_are_ready() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv", "b.mkv"]);

        let verdict = check_ready(&batch, Duration::from_millis(10)).await;
        assert!(verdict.is_ready());
    }

    #[tokio::test]
    async fn test_empty_batch_is_never_ready() {
        let dir = tempfile::tempdir().unwrap();
        let batch = MediaBatch::from_files(dir.path(), Vec::new());

        let verdict = check_ready(&batch, Duration::ZERO).await;
        assert_eq!(
            verdict,
            ReadinessVerdict::NotReady {
                file: None,
                reason: NotReadyReason::EmptyBatch
            }
        );
        assert!(matches!(
            verdict.into_result(&batch),
            Err(postdrop_common::Error::EmptyBatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_partial_marker_blocks_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv", "b.mkv"]);
        fs::write(dir.path().join("b.mkv.part"), b"").unwrap();

        let verdict = check_ready(&batch, Duration::ZERO).await;
        match verdict {
            ReadinessVerdict::NotReady {
                file: Some(file),
                reason: NotReadyReason::PartialMarker(marker),
            } => {
                assert_eq!(file, dir.path().join("b.mkv"));
                assert_eq!(marker, dir.path().join("b.mkv.part"));
            }
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_incomplete_marker_blocks_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv"]);
        fs::write(dir.path().join("a.mkv.incomplete"), b"").unwrap();

        let verdict = check_ready(&batch, Duration::ZERO).await;
        assert!(matches!(
            verdict,
            ReadinessVerdict::NotReady {
                reason: NotReadyReason::IncompleteMarker(_),
                ..
            }
        ));

        let err = verdict.into_result(&batch).unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("incomplete marker"));
    }

    #[tokio::test]
    async fn test_partial_checked_before_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv"]);
        fs::write(dir.path().join("a.mkv.partial"), b"").unwrap();
        fs::write(dir.path().join("a.mkv.!qB"), b"").unwrap();

        let verdict = check_ready(&batch, Duration::ZERO).await;
        assert!(matches!(
            verdict,
            ReadinessVerdict::NotReady {
                reason: NotReadyReason::PartialMarker(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_growing_file_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv", "b.mkv"]);
        let growing = dir.path().join("b.mkv");

        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let mut f = fs::OpenOptions::new().append(true).open(&growing).unwrap();
            f.write_all(b" more data").unwrap();
        });

        let verdict = check_ready(&batch, Duration::from_millis(300)).await;
        writer.await.unwrap();

        match verdict {
            ReadinessVerdict::NotReady {
                file: Some(file),
                reason: NotReadyReason::SizeUnstable { before, after },
            } => {
                assert_eq!(file, dir.path().join("b.mkv"));
                assert_eq!(before, 10);
                assert_eq!(after, 20);
            }
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vanished_file_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv"]);
        let doomed = dir.path().join("a.mkv");

        let remover = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::remove_file(&doomed).unwrap();
        });

        let verdict = check_ready(&batch, Duration::from_millis(300)).await;
        remover.await.unwrap();

        assert!(matches!(
            verdict,
            ReadinessVerdict::NotReady {
                reason: NotReadyReason::Vanished,
                ..
            }
        ));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_open_writer_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with(dir.path(), &["a.mkv"]);
        let _writer = fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join("a.mkv"))
            .unwrap();

        let verdict = check_ready(&batch, Duration::ZERO).await;
        assert!(matches!(
            verdict,
            ReadinessVerdict::NotReady {
                reason: NotReadyReason::OpenByWriter,
                ..
            }
        ));
    }
}
