//! Best-effort filesystem housekeeping around a rename run.
//!
//! Nothing here fails the pipeline: entries that cannot be removed are logged
//! and skipped.

use postdrop_common::paths::has_extension;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Delete every file under `root` whose extension is in `extensions`.
///
/// Returns the files actually removed.
pub fn remove_junk(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut removed = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::debug!("Removed junk file {:?}", entry.path());
                removed.push(entry.into_path());
            }
            Err(e) => {
                tracing::warn!("Failed to remove junk file {:?}: {}", entry.path(), e);
            }
        }
    }

    tracing::info!("Removed {} junk files under {:?}", removed.len(), root);
    removed
}

/// Remove empty directories beneath `root`, deepest first.
///
/// `root` itself is kept. A directory emptied by removing its children is
/// removed in the same pass.
pub fn prune_empty_dirs(root: &Path) -> Vec<PathBuf> {
    let mut pruned = Vec::new();

    let dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();

    for dir in dirs {
        if !is_empty_dir(&dir) {
            continue;
        }
        match fs::remove_dir(&dir) {
            Ok(()) => {
                tracing::debug!("Pruned empty directory {:?}", dir);
                pruned.push(dir);
            }
            Err(e) => tracing::warn!("Failed to prune {:?}: {}", dir, e),
        }
    }

    tracing::info!("Pruned {} empty directories under {:?}", pruned.len(), root);
    pruned
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
