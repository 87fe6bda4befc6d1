//! The rename engine capability and its process-backed implementation.

use crate::command::{build_args, EngineSettings};
use crate::source::{ActionMode, MetadataSource};
use crate::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Inputs for a single engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    /// Directory or file to organize.
    pub source: PathBuf,
    /// Database to identify against; `None` lets the engine auto-detect.
    pub metadata_source: Option<MetadataSource>,
    /// Preview or move.
    pub action: ActionMode,
    /// Pass the engine's lenient-matching flag.
    pub non_strict: bool,
}

impl EngineRequest {
    /// Let the engine pick the database itself.
    pub fn auto_detect(source: impl Into<PathBuf>, action: ActionMode) -> Self {
        Self {
            source: source.into(),
            metadata_source: None,
            action,
            non_strict: true,
        }
    }

    /// Identify against a specific database.
    pub fn with_source(
        source: impl Into<PathBuf>,
        metadata_source: MetadataSource,
        action: ActionMode,
    ) -> Self {
        Self {
            source: source.into(),
            metadata_source: Some(metadata_source),
            action,
            non_strict: true,
        }
    }

    /// No database and no lenient matching; relies on identification data
    /// the engine cached from earlier runs.
    pub fn last_resort(source: impl Into<PathBuf>, action: ActionMode) -> Self {
        Self {
            source: source.into(),
            metadata_source: None,
            action,
            non_strict: false,
        }
    }
}

/// Output captured from a completed engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Process exit code; `None` if terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl EngineOutput {
    /// Build an output from literal text, as the engine would print it.
    pub fn new(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout.trim_end(), self.stderr)
        }
    }
}

/// Something that can organize a directory of media files.
///
/// Implementations must return `Ok` for every run that completed, whatever
/// its exit status; `Err` is reserved for runs that could not start or did not
/// finish.
#[async_trait::async_trait]
pub trait RenameEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Run the engine once.
    async fn run(&self, request: &EngineRequest) -> Result<EngineOutput>;
}

/// Runs the engine as a child process.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    name: String,
    settings: EngineSettings,
}

impl ProcessEngine {
    pub fn new(program: PathBuf, settings: EngineSettings) -> Self {
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string_lossy().to_string());

        Self {
            program,
            name,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl RenameEngine for ProcessEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, request: &EngineRequest) -> Result<EngineOutput> {
        let args = build_args(&self.settings, request);
        tracing::debug!(engine = %self.name, ?args, "Launching rename engine");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::engine_not_found(&self.name)
                } else {
                    Error::launch_failed(&self.name, format!("failed to spawn: {e}"))
                }
            })?;

        let result = tokio::time::timeout(self.settings.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(output)) => Ok(EngineOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Err(e)) => Err(Error::launch_failed(
                &self.name,
                format!("I/O error waiting for process: {e}"),
            )),
            // The child future is dropped here and kill_on_drop reaps it.
            Err(_elapsed) => Err(Error::Timeout {
                program: self.name.clone(),
                secs: self.settings.timeout.as_secs(),
            }),
        }
    }
}
