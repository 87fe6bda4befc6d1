//! Discovery of the video files a pipeline run operates on.

use postdrop_common::paths::is_video_file;
use postdrop_common::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The video files under one source path.
///
/// Discovered once when a run starts and never changed afterwards; files may
/// move on disk but the batch keeps the paths they were found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBatch {
    source: PathBuf,
    files: Vec<PathBuf>,
}

impl MediaBatch {
    /// Scan `source` for video files.
    ///
    /// `source` may be a directory (searched recursively) or a single file.
    /// An empty result is not an error here; the pipeline decides.
    pub fn discover(source: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(source)?;

        let mut files = Vec::new();
        if metadata.is_file() {
            if is_video_file(source) {
                files.push(source.to_path_buf());
            }
        } else {
            for entry in WalkDir::new(source)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_video_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();

        tracing::debug!("Discovered {} media files under {:?}", files.len(), source);

        Ok(Self {
            source: source.to_path_buf(),
            files,
        })
    }

    /// Build a batch from known paths without touching the filesystem.
    pub fn from_files(source: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            source: source.into(),
            files,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the source is a directory rather than a single file.
    pub fn is_directory(&self) -> bool {
        self.source.is_dir()
    }

    /// Base filenames, lossily converted.
    pub fn file_names(&self) -> impl Iterator<Item = String> + '_ {
        self.files.iter().filter_map(|p| {
            p.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    /// Fail with [`Error::EmptyBatch`] when no video was found.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                path: self.source.clone(),
            });
        }
        Ok(())
    }
}
