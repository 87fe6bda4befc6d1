//! Fallback orchestration across metadata sources.
//!
//! The engine is first asked to auto-detect. When that affects nothing the
//! batch is classified and the source chains are walked in category order,
//! finishing with one strict last-resort attempt. The first attempt that
//! affects files wins; only exhausting every strategy is a failure.

pub mod diagnose;
pub mod strategy;

pub use diagnose::{likely_causes, LikelyCause};
pub use strategy::{chains_for, Stage, Strategy, MOVIE_CHAIN, TV_CHAIN};

use crate::batch::MediaBatch;
use crate::classify::{Classification, TypeClassifier};
use crate::rename::{Invocation, RenameAdapter};
use postdrop_common::{Error, MediaCategory, Result};
use postdrop_engine::{destinations, ActionMode};
use std::path::PathBuf;

/// One strategy and what came of it.
#[derive(Debug, Clone)]
pub struct StrategyAttempt {
    pub strategy: Strategy,
    pub invocation: Invocation,
}

impl StrategyAttempt {
    pub fn succeeded(&self) -> bool {
        self.invocation.succeeded()
    }
}

/// Every attempt made for a batch, in order.
#[derive(Debug, Clone)]
pub struct FallbackReport {
    pub attempts: Vec<StrategyAttempt>,
    /// Set once auto-detection has failed and the batch was classified.
    pub classification: Option<Classification>,
}

impl FallbackReport {
    /// The attempt that affected files, if any. Always the last one.
    pub fn winner(&self) -> Option<&StrategyAttempt> {
        self.attempts.last().filter(|a| a.succeeded())
    }

    pub fn succeeded(&self) -> bool {
        self.winner().is_some()
    }

    /// Files affected by the winning attempt.
    pub fn files_affected(&self) -> usize {
        self.winner().map_or(0, |a| a.invocation.files_affected)
    }

    /// Category used to pick the library section to rescan.
    ///
    /// Comes from the winning source when it is specific to one kind of
    /// media, otherwise from the classification.
    pub fn category(&self) -> MediaCategory {
        if let Some(source) = self.winner().and_then(|a| a.strategy.source) {
            return if source.is_episodic() {
                MediaCategory::Tv
            } else {
                MediaCategory::Movie
            };
        }
        self.classification
            .map_or(MediaCategory::Unknown, |c| c.category)
    }

    /// Where the winning attempt put (or would put) each file.
    pub fn destinations(&self, action: ActionMode) -> Vec<PathBuf> {
        self.winner()
            .map(|w| destinations(&w.invocation.output, action))
            .unwrap_or_default()
    }

    /// Attempts whose stage matches.
    pub fn attempts_in(&self, stage: Stage) -> impl Iterator<Item = &StrategyAttempt> {
        self.attempts.iter().filter(move |a| a.strategy.stage == stage)
    }

    /// Likely causes across all attempt outputs.
    pub fn likely_causes(&self) -> Vec<LikelyCause> {
        likely_causes(self.attempts.iter().map(|a| a.invocation.output.as_str()))
    }
}

/// Walks the strategies for a batch until one affects files.
pub struct FallbackOrchestrator {
    adapter: RenameAdapter,
    classifier: TypeClassifier,
    action: ActionMode,
}

impl FallbackOrchestrator {
    pub fn new(adapter: RenameAdapter, action: ActionMode) -> Self {
        Self {
            adapter,
            classifier: TypeClassifier::new(),
            action,
        }
    }

    /// Attempt every strategy in order, stopping at the first success.
    pub async fn run(&self, batch: &MediaBatch) -> FallbackReport {
        let mut report = FallbackReport {
            attempts: Vec::new(),
            classification: None,
        };

        if self.attempt(batch, Strategy::AUTO_DETECT, &mut report).await {
            return report;
        }

        let classification = self.classifier.classify(batch);
        report.classification = Some(classification);

        for strategy in chains_for(classification.category) {
            if self.attempt(batch, strategy, &mut report).await {
                return report;
            }
        }

        if self.attempt(batch, Strategy::LAST_RESORT, &mut report).await {
            return report;
        }

        self.log_exhaustion(batch, &report);
        report
    }

    /// Like [`run`](Self::run), but exhaustion becomes
    /// [`Error::ChainExhausted`].
    pub async fn rename(&self, batch: &MediaBatch) -> Result<FallbackReport> {
        let report = self.run(batch).await;
        if report.succeeded() {
            Ok(report)
        } else {
            Err(Error::ChainExhausted {
                path: batch.source().to_path_buf(),
                attempts: report.attempts.len(),
            })
        }
    }

    async fn attempt(
        &self,
        batch: &MediaBatch,
        strategy: Strategy,
        report: &mut FallbackReport,
    ) -> bool {
        tracing::info!(
            strategy = %strategy,
            engine = self.adapter.engine_name(),
            action = %self.action,
            "Trying rename strategy"
        );

        let request = strategy.request(batch.source(), self.action);
        let invocation = self.adapter.invoke_request(&request).await;
        let succeeded = invocation.succeeded();

        if succeeded {
            tracing::info!(
                strategy = %strategy,
                files = invocation.files_affected,
                "Rename strategy succeeded"
            );
        } else {
            tracing::warn!(
                strategy = %strategy,
                exit_code = ?invocation.exit_code,
                "Rename strategy affected no files"
            );
        }

        report.attempts.push(StrategyAttempt {
            strategy,
            invocation,
        });
        succeeded
    }

    fn log_exhaustion(&self, batch: &MediaBatch, report: &FallbackReport) {
        tracing::error!(
            source = %batch.source().display(),
            attempts = report.attempts.len(),
            "All rename strategies failed"
        );

        for (i, attempt) in report.attempts.iter().enumerate() {
            tracing::error!(
                "  attempt {}: {} exit={:?}",
                i + 1,
                attempt.strategy,
                attempt.invocation.exit_code
            );
        }

        for file in batch.files() {
            let size = std::fs::metadata(file).map(|m| m.len()).ok();
            match size {
                Some(size) => tracing::error!("  file: {} ({} bytes)", file.display(), size),
                None => tracing::error!("  file: {} (missing)", file.display()),
            }
        }

        let causes = report.likely_causes();
        if causes.is_empty() {
            tracing::error!("  no recognizable cause in engine output; see the log file");
        }
        for cause in causes {
            tracing::error!("  likely cause ({}): {}", cause, cause.hint());
        }
    }
}
