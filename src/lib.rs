//! postdrop - post-download media pipeline
//!
//! Takes a finished download, waits until it is safe to touch, removes junk,
//! has a rename engine organize it into a media library, and asks the media
//! server to rescan. This library crate exposes each stage for the binary and
//! for integration testing.

pub mod batch;
pub mod classify;
pub mod config;
pub mod context;
pub mod fallback;
pub mod hook;
pub mod logging;
pub mod notifications;
pub mod pipeline;
pub mod readiness;
pub mod rename;
