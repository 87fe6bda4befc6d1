//! Torrent-client completion hook.
//!
//! Transmission runs its "script-torrent-done" hook with the finished
//! download described in the environment. The source is
//! `TR_TORRENT_DIR/TR_TORRENT_NAME`.

use postdrop_common::{Error, Result};
use std::path::{Component, PathBuf};

pub const ENV_TORRENT_DIR: &str = "TR_TORRENT_DIR";
pub const ENV_TORRENT_NAME: &str = "TR_TORRENT_NAME";

/// Source path named by the hook environment.
///
/// Both variables must be present and non-empty; anything else means the
/// binary was started by hand.
pub fn source_from_env() -> Result<PathBuf> {
    source_from(
        std::env::var(ENV_TORRENT_DIR).ok(),
        std::env::var(ENV_TORRENT_NAME).ok(),
    )
}

/// Source path from the two hook values.
pub fn source_from(dir: Option<String>, name: Option<String>) -> Result<PathBuf> {
    let dir = dir.filter(|d| !d.trim().is_empty());
    let name = name.filter(|n| !n.trim().is_empty());

    // The name must stay inside the download directory: `..` and `.` would
    // make cleanup run over the directory itself or its parent.
    match (dir, name) {
        (Some(dir), Some(name)) => {
            let name = PathBuf::from(name);
            let mut components = name.components();
            let single_normal = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single_normal {
                return Err(Error::invalid_input(format!(
                    "{} must be a single path component, got {:?}",
                    ENV_TORRENT_NAME, name
                )));
            }
            Ok(PathBuf::from(dir).join(name))
        }
        _ => Err(Error::invalid_input(format!(
            "manual invocation: {} and {} are not both set; use `postdrop run <path>` instead",
            ENV_TORRENT_DIR, ENV_TORRENT_NAME
        ))),
    }
}
