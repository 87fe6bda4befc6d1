//! Explicit per-process context threaded through every pipeline stage.

use crate::config::Config;
use crate::logging::LogSink;
use postdrop_engine::ActionMode;
use std::sync::Arc;

/// Configuration and log sink for one invocation.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub log: LogSink,
    /// Simulate renames and skip every destructive step.
    pub dry_run: bool,
}

impl PipelineContext {
    pub fn new(config: Config, log: LogSink) -> Self {
        Self {
            config: Arc::new(config),
            log,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Engine action implied by the dry-run flag.
    pub fn action(&self) -> ActionMode {
        if self.dry_run {
            ActionMode::Simulate
        } else {
            ActionMode::Commit
        }
    }
}
