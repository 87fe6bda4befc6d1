//! Rename engine adapter.
//!
//! Wraps a [`RenameEngine`] so that every run is logged in full and judged by
//! the files it actually affected, never by its exit code alone. Failures are
//! returned as values for the fallback chain to compose.

use crate::batch::MediaBatch;
use crate::logging::LogSink;
use postdrop_engine::{ActionMode, EngineRequest, MetadataSource, OutputSummary, RenameEngine};
use std::sync::Arc;

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Files the engine reported as simulated or moved, per the action.
    pub files_affected: usize,
    /// Exit code; `None` when the engine did not run to completion.
    pub exit_code: Option<i32>,
    /// Engine stdout and stderr, or the launch error.
    pub output: String,
}

impl Invocation {
    /// Affected files are the authoritative success signal.
    pub fn succeeded(&self) -> bool {
        self.files_affected > 0
    }
}

/// Runs the engine against a batch and interprets the result.
#[derive(Clone)]
pub struct RenameAdapter {
    engine: Arc<dyn RenameEngine>,
    log: LogSink,
}

impl RenameAdapter {
    pub fn new(engine: Arc<dyn RenameEngine>, log: LogSink) -> Self {
        Self { engine, log }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Run the engine with an optional metadata source.
    pub async fn invoke(
        &self,
        batch: &MediaBatch,
        metadata_source: Option<MetadataSource>,
        action: ActionMode,
    ) -> Invocation {
        let request = match metadata_source {
            Some(source) => EngineRequest::with_source(batch.source(), source, action),
            None => EngineRequest::auto_detect(batch.source(), action),
        };
        self.invoke_request(&request).await
    }

    /// Run the engine with a fully specified request.
    pub async fn invoke_request(&self, request: &EngineRequest) -> Invocation {
        let label = match request.metadata_source {
            Some(source) => format!("{} --db {}", self.engine.name(), source),
            None => format!("{} (no --db)", self.engine.name()),
        };

        let invocation = match self.engine.run(request).await {
            Ok(output) => {
                let text = output.combined();
                let summary = OutputSummary::parse(&text);
                Invocation {
                    files_affected: summary.affected(request.action),
                    exit_code: output.exit_code,
                    output: text,
                }
            }
            Err(e) => Invocation {
                files_affected: 0,
                exit_code: None,
                output: e.to_string(),
            },
        };

        self.log.append_block(
            &format!(
                "{} {} exit={:?} affected={}",
                label, request.action, invocation.exit_code, invocation.files_affected
            ),
            &invocation.output,
        );

        if invocation.succeeded() {
            if invocation.exit_code != Some(0) {
                tracing::info!(
                    exit_code = ?invocation.exit_code,
                    files = invocation.files_affected,
                    "Engine reported a failure status but processed files; treating as success"
                );
            }
        } else {
            tracing::debug!(
                exit_code = ?invocation.exit_code,
                "Engine affected no files"
            );
        }

        invocation
    }
}
