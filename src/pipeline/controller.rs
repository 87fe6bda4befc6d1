use super::cleanup::{prune_empty_dirs, remove_junk};
use crate::batch::MediaBatch;
use crate::classify::{classify, classify_destinations};
use crate::context::PipelineContext;
use crate::fallback::{FallbackOrchestrator, FallbackReport};
use crate::notifications::{LibraryScanner, PlexNotifier};
use crate::readiness::ReadinessChecker;
use crate::rename::RenameAdapter;
use postdrop_common::{MediaCategory, Result};
use postdrop_engine::tools::DEFAULT_ENGINE;
use postdrop_engine::{resolve_engine, ProcessEngine, RenameEngine};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pipeline stages, in the only order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    CheckingReadiness,
    Cleaning,
    Processing,
    PostProcessing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::CheckingReadiness => "checking-readiness",
            Self::Cleaning => "cleaning",
            Self::Processing => "processing",
            Self::PostProcessing => "post-processing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub source: PathBuf,
    pub dry_run: bool,
    /// Video files in the batch.
    pub files: usize,
    pub junk_removed: Vec<PathBuf>,
    pub dirs_pruned: Vec<PathBuf>,
    pub rename: FallbackReport,
    /// Category used for the rescan.
    pub category: MediaCategory,
    /// `None` when no rescan was attempted.
    pub rescanned: Option<bool>,
}

/// Runs one batch from readiness to rescan.
pub struct Pipeline {
    ctx: PipelineContext,
    engine: Arc<dyn RenameEngine>,
    scanner: Arc<dyn LibraryScanner>,
}

impl Pipeline {
    pub fn new(
        ctx: PipelineContext,
        engine: Arc<dyn RenameEngine>,
        scanner: Arc<dyn LibraryScanner>,
    ) -> Self {
        Self {
            ctx,
            engine,
            scanner,
        }
    }

    /// Build a pipeline with the process-backed engine and the Plex notifier.
    ///
    /// An engine that cannot be found is not an error here: every strategy
    /// then fails with a "engine not found" diagnosis.
    pub fn from_context(ctx: PipelineContext) -> Self {
        let config = &ctx.config;
        let program = resolve_engine(config.engine.path.as_deref()).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            config
                .engine
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE))
        });
        let settings = config.engine.settings(&config.library.target_root);
        let engine = Arc::new(ProcessEngine::new(program, settings));
        let scanner = Arc::new(PlexNotifier::new(&config.plex));
        Self::new(ctx, engine, scanner)
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Process `source` through every stage.
    ///
    /// The first failing stage ends the run; its error is logged here with
    /// the stage name and returned unchanged.
    pub async fn run(&self, source: &Path) -> Result<PipelineReport> {
        let mut stage = Stage::Validating;
        let result = self.run_stages(source, &mut stage).await;
        if let Err(ref e) = result {
            tracing::error!(stage = %stage, source = %source.display(), "Pipeline failed: {}", e);
        }
        result
    }

    fn enter(&self, current: &mut Stage, next: Stage) {
        tracing::info!(from = %current, to = %next, "Pipeline stage");
        *current = next;
    }

    /// Category for a win that named no kind of media: the engine's
    /// destinations first, then the source filenames when auto-detect won
    /// before any classification ran.
    fn infer_category(&self, batch: &MediaBatch, rename: &FallbackReport) -> MediaCategory {
        let dests = rename.destinations(self.ctx.action());
        let category = classify_destinations(&dests, &self.ctx.config.library.target_root);
        if category != MediaCategory::Unknown {
            tracing::debug!(category = %category, "Category taken from engine destinations");
            return category;
        }
        match rename.classification {
            None => classify(batch).category,
            Some(_) => MediaCategory::Unknown,
        }
    }

    async fn run_stages(&self, source: &Path, stage: &mut Stage) -> Result<PipelineReport> {
        let config = &self.ctx.config;
        let dry_run = self.ctx.dry_run;

        tracing::info!(source = %source.display(), dry_run, "Pipeline started");

        let batch = MediaBatch::discover(source)?;
        batch.ensure_not_empty()?;
        tracing::info!("Batch has {} media files", batch.len());

        self.enter(stage, Stage::CheckingReadiness);
        ReadinessChecker::new(config.readiness.stability_window())
            .check(&batch)
            .await
            .into_result(&batch)?;

        self.enter(stage, Stage::Cleaning);
        let junk_removed = if dry_run {
            tracing::info!("[DRY RUN] Skipping junk cleanup");
            Vec::new()
        } else if !batch.is_directory() {
            tracing::info!("Single-file source, skipping junk cleanup");
            Vec::new()
        } else {
            remove_junk(batch.source(), &config.cleanup.junk_extensions)
        };

        self.enter(stage, Stage::Processing);
        let adapter = RenameAdapter::new(self.engine.clone(), self.ctx.log.clone());
        let rename = FallbackOrchestrator::new(adapter, self.ctx.action())
            .rename(&batch)
            .await?;
        let category = match rename.category() {
            MediaCategory::Unknown => self.infer_category(&batch, &rename),
            category => category,
        };

        self.enter(stage, Stage::PostProcessing);
        let mut dirs_pruned = Vec::new();
        let mut rescanned = None;
        if dry_run {
            tracing::info!(
                category = %category,
                "[DRY RUN] Skipping empty-directory pruning and library rescan"
            );
        } else {
            if batch.is_directory() {
                dirs_pruned = prune_empty_dirs(batch.source());
            }
            let ok = self.scanner.scan_category(category).await;
            if !ok {
                tracing::warn!(
                    scanner = self.scanner.name(),
                    category = %category,
                    "Library rescan failed; files are organized but may not show up until the next scan"
                );
            }
            rescanned = Some(ok);
        }

        self.enter(stage, Stage::Done);
        tracing::info!(
            files = rename.files_affected(),
            category = %category,
            "Pipeline finished"
        );

        Ok(PipelineReport {
            source: source.to_path_buf(),
            dry_run,
            files: batch.len(),
            junk_removed,
            dirs_pruned,
            rename,
            category,
            rescanned,
        })
    }
}
