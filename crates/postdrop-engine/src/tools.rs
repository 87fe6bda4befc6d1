//! Locating the engine executable.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable name looked up on `PATH` when no engine path is configured.
pub const DEFAULT_ENGINE: &str = "filebot";

/// What `check` reports about the engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub program: PathBuf,
    /// First line of `-version`, when the engine answers it.
    pub version: Option<String>,
}

/// Probe a resolved engine for its version.
///
/// A program that rejects `-version` still counts as present; only the
/// version is missing then.
pub fn probe_engine(program: &Path) -> EngineInfo {
    let version = Command::new(program)
        .arg("-version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| {
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(String::from)
        });

    EngineInfo {
        program: program.to_path_buf(),
        version,
    }
}

/// Find `name` on `PATH`.
pub fn find_on_path(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::engine_not_found(name))
}

/// Resolve the engine executable, preferring a configured path over `PATH`.
///
/// A configured path that does not exist falls back to searching `PATH` for
/// its file name.
pub fn resolve_engine(configured: Option<&Path>) -> Result<PathBuf> {
    let Some(path) = configured else {
        return find_on_path(DEFAULT_ENGINE);
    };

    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    tracing::warn!(path = %path.display(), "Configured engine path does not exist, searching PATH");
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => find_on_path(name),
        None => Err(Error::engine_not_found(path.display().to_string())),
    }
}
