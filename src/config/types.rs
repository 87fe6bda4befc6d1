use postdrop_common::paths::junk_extensions;
use postdrop_engine::command::{DEFAULT_APPLY, DEFAULT_CONFLICT, DEFAULT_FORMAT};
use postdrop_engine::EngineSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Shared log file used when `logging.file` is not configured.
pub const DEFAULT_LOG_FILE: &str = "~/.local/state/postdrop/postdrop.log";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub plex: PlexConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlexConfig {
    /// Base URL of the media server, e.g. `http://localhost:32400`
    #[serde(default)]
    pub url: String,

    /// Access token sent as `X-Plex-Token`
    #[serde(default)]
    pub token: String,

    /// Library section rescanned after TV episodes are organized
    #[serde(default = "default_show_section")]
    pub show_section: u32,

    /// Library section rescanned after movies are organized
    #[serde(default = "default_movie_section")]
    pub movie_section: u32,

    /// Maximum refresh attempts per rescan (default: 3)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between refresh attempts (default: 5)
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Per-request timeout (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_show_section() -> u32 {
    2
}
fn default_movie_section() -> u32 {
    1
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    5
}
fn default_timeout() -> u64 {
    10
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            show_section: default_show_section(),
            movie_section: default_movie_section(),
            retry_attempts: default_retry_attempts(),
            retry_delay_secs: default_retry_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

impl PlexConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Root the rename engine organizes files under
    #[serde(default)]
    pub target_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Engine executable; searched on PATH when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Naming template identifier
    #[serde(default = "default_format")]
    pub format: String,

    /// Conflict-resolution policy
    #[serde(default = "default_conflict")]
    pub conflict: String,

    /// Post-processing directives
    #[serde(default = "default_apply")]
    pub apply: Vec<String>,

    /// Maximum duration of one engine run (default: 3600)
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_conflict() -> String {
    DEFAULT_CONFLICT.to_string()
}
fn default_apply() -> Vec<String> {
    DEFAULT_APPLY.iter().map(|s| s.to_string()).collect()
}
fn default_engine_timeout() -> u64 {
    3600
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: default_format(),
            conflict: default_conflict(),
            apply: default_apply(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl EngineConfig {
    /// Engine settings rooted at `target_root`.
    pub fn settings(&self, target_root: &std::path::Path) -> EngineSettings {
        EngineSettings::new(target_root)
            .with_format(&self.format)
            .with_conflict(&self.conflict)
            .with_apply(self.apply.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessConfig {
    /// How long file sizes must stay unchanged (default: 5)
    #[serde(default = "default_stability_window")]
    pub stability_window_secs: u64,
}

fn default_stability_window() -> u64 {
    5
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            stability_window_secs: default_stability_window(),
        }
    }
}

impl ReadinessConfig {
    pub fn stability_window(&self) -> Duration {
        Duration::from_secs(self.stability_window_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Extensions deleted before organizing, without leading dot
    #[serde(default = "default_junk_extensions")]
    pub junk_extensions: Vec<String>,
}

fn default_junk_extensions() -> Vec<String> {
    junk_extensions().iter().map(|s| s.to_string()).collect()
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            junk_extensions: default_junk_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append-only log file holding diagnostics and every engine transcript
    /// (default: "~/.local/state/postdrop/postdrop.log")
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,

    /// Default filter when RUST_LOG is not set (default: "info")
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_LOG_FILE))
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_level(),
        }
    }
}
