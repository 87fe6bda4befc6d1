//! Extension checks that decide what belongs to a batch.
//!
//! Video files make up a batch; junk files are deleted before the rename
//! engine runs so they never land in the library.

use std::path::Path;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "m2ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
];

/// Default for `cleanup.junk_extensions`.
const JUNK_EXTENSIONS: &[&str] = &[
    "txt", "nfo", "url", "lnk", "exe", "sfv", "md5", "html", "htm", "website", "db",
];

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Whether `path` is a video the engine should be given.
///
/// ```
/// use std::path::Path;
/// use postdrop_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("/downloads/Show.S01E01.MKV")));
/// assert!(!is_video_file(Path::new("release.nfo")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    extension_of(path)
        .is_some_and(|ext| VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)))
}

/// Whether the extension of `path` is in `extensions`, ignoring case.
/// Entries carry no leading dot.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    extension_of(path).is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[must_use]
pub fn junk_extensions() -> &'static [&'static str] {
    JUNK_EXTENSIONS
}
