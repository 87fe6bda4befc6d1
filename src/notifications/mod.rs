pub mod plex;

pub use plex::{PlexNotifier, RescanRequest};

use async_trait::async_trait;
use postdrop_common::MediaCategory;

/// A media server that can be told to re-index a library.
#[async_trait]
pub trait LibraryScanner: Send + Sync {
    fn name(&self) -> &str;

    /// Rescan the library holding `category`.
    ///
    /// Returns whether the server accepted the request. Errors are logged,
    /// never propagated: a failed rescan does not undo organized files.
    async fn scan_category(&self, category: MediaCategory) -> bool;
}
