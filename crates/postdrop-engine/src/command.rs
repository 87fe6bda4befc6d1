//! Command-line construction for the rename engine.

use crate::engine::EngineRequest;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Default naming template identifier.
pub const DEFAULT_FORMAT: &str = "{plex}";

/// Default conflict-resolution policy.
pub const DEFAULT_CONFLICT: &str = "auto";

/// Post-processing directives applied after a successful rename: artwork
/// fetch, metadata import, subtitle fetch, date tagging, permission fixup,
/// empty-directory pruning and thumbnail generation.
pub const DEFAULT_APPLY: &[&str] = &[
    "artwork",
    "import",
    "subtitles",
    "date",
    "chmod",
    "prune",
    "thumbnail",
];

/// Default limit for a single engine run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Settings shared by every invocation in a run.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Library root the engine moves files under.
    pub target_root: PathBuf,
    /// Naming template identifier.
    pub format: String,
    /// Conflict-resolution policy.
    pub conflict: String,
    /// Post-processing directives.
    pub apply: Vec<String>,
    /// Maximum wall-clock time for one run.
    pub timeout: Duration,
}

impl EngineSettings {
    /// Settings with default template, policy and directives.
    pub fn new(target_root: impl Into<PathBuf>) -> Self {
        Self {
            target_root: target_root.into(),
            format: DEFAULT_FORMAT.to_string(),
            conflict: DEFAULT_CONFLICT.to_string(),
            apply: DEFAULT_APPLY.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_conflict(mut self, conflict: impl Into<String>) -> Self {
        self.conflict = conflict.into();
        self
    }

    pub fn with_apply(mut self, apply: Vec<String>) -> Self {
        self.apply = apply;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Build the argument vector for one engine run.
///
/// `--apply` consumes every following token, so it always comes last.
pub fn build_args(settings: &EngineSettings, request: &EngineRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-rename".into(),
        request.source.clone().into_os_string(),
        "-r".into(),
        "--output".into(),
        settings.target_root.clone().into_os_string(),
        "--format".into(),
        settings.format.clone().into(),
        "--conflict".into(),
        settings.conflict.clone().into(),
        "--action".into(),
        request.action.engine_action().into(),
    ];

    if let Some(source) = request.metadata_source {
        args.push("--db".into());
        args.push(source.engine_id().into());
    }

    if request.non_strict {
        args.push("-non-strict".into());
    }

    args.push("--log".into());
    args.push("all".into());

    if !settings.apply.is_empty() {
        args.push("--apply".into());
        args.extend(settings.apply.iter().map(OsString::from));
    }

    args
}
