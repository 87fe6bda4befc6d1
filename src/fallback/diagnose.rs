//! Likely-cause detection for a fully failed fallback chain.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A probable reason every strategy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikelyCause {
    /// The rename engine binary is missing.
    EngineMissing,
    Connectivity,
    Permissions,
    Licensing,
    Identification,
    DiskSpace,
}

impl LikelyCause {
    /// One-line hint for the operator.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::EngineMissing => "rename engine not found; install it or set engine.path",
            Self::Connectivity => "metadata sources unreachable; check network and DNS",
            Self::Permissions => "permission denied; check ownership of source and target root",
            Self::Licensing => "rename engine license problem; check its activation",
            Self::Identification => "no source could identify the files; rename them or process manually",
            Self::DiskSpace => "target disk is full",
        }
    }
}

impl fmt::Display for LikelyCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EngineMissing => "engine-missing",
            Self::Connectivity => "connectivity",
            Self::Permissions => "permissions",
            Self::Licensing => "licensing",
            Self::Identification => "identification",
            Self::DiskSpace => "disk-space",
        };
        f.write_str(name)
    }
}

static PATTERNS: Lazy<Vec<(LikelyCause, Regex)>> = Lazy::new(|| {
    [
        (LikelyCause::EngineMissing, r"(?i)engine not found"),
        (
            LikelyCause::Connectivity,
            r"(?i)UnknownHostException|ConnectException|SocketTimeoutException|connection refused|network is unreachable|no route to host|timed out",
        ),
        (
            LikelyCause::Permissions,
            r"(?i)permission denied|AccessDeniedException|operation not permitted|read-only file system",
        ),
        (LikelyCause::Licensing, r"(?i)\blicen[cs]e"),
        (
            LikelyCause::Identification,
            r"(?i)failed to identify|unable to (?:identify|auto-detect)|no (?:episode|movie|series) (?:data|match)|finished without processing",
        ),
        (
            LikelyCause::DiskSpace,
            r"(?i)no space left on device|disk quota exceeded|not enough (?:disk )?space",
        ),
    ]
    .into_iter()
    .map(|(cause, pattern)| (cause, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// Causes matched anywhere in the given outputs, in a fixed order, without
/// duplicates.
pub fn likely_causes<'a, I>(outputs: I) -> Vec<LikelyCause>
where
    I: IntoIterator<Item = &'a str>,
{
    let outputs: Vec<&str> = outputs.into_iter().collect();
    PATTERNS
        .iter()
        .filter(|(_, re)| outputs.iter().any(|out| re.is_match(out)))
        .map(|(cause, _)| *cause)
        .collect()
}
