//! Postdrop-Common: shared types, errors, and path utilities.
//!
//! This crate provides common functionality used across postdrop:
//!
//! - **Core Types**: the media category a batch is classified into
//! - **Path Utilities**: functions to detect video and junk files by extension
//! - **Error Handling**: the error taxonomy every pipeline stage reports with
//!
//! # Examples
//!
//! ```
//! use postdrop_common::{Error, MediaCategory, Result};
//! use postdrop_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let category: MediaCategory = "tv".parse().unwrap();
//! assert_eq!(category, MediaCategory::Tv);
//!
//! assert!(is_video_file(Path::new("The.Show.S01E01.mkv")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::EmptyBatch {
//!         path: "/downloads/nothing".into(),
//!     })
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
