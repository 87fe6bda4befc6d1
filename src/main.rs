mod cli;

use postdrop::{
    batch::MediaBatch,
    classify, config, hook,
    context::PipelineContext,
    logging::{self, LogSink},
    notifications::PlexNotifier,
    pipeline::Pipeline,
};
use postdrop_engine::{probe_engine, resolve_engine};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tokio::signal;

async fn run_pipeline(ctx: PipelineContext, source: &Path) -> Result<()> {
    let pipeline = Pipeline::from_context(ctx);

    tokio::select! {
        result = pipeline.run(source) => {
            let report = result?;
            println!(
                "{} {} file(s) from {} ({})",
                if report.dry_run { "Would organize" } else { "Organized" },
                report.rename.files_affected(),
                report.source.display(),
                report.category
            );
            Ok(())
        }
        _ = shutdown_signal() => {
            tracing::warn!(source = %source.display(), "Interrupted; leaving files as they are");
            anyhow::bail!("interrupted")
        }
    }
}

/// Resolves on Ctrl+C, or on SIGTERM from a torrent client or service manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("postdrop {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = config::load_config_or_default(cli.config.as_deref())?;
    let sink = LogSink::new(config.logging.file.clone());
    logging::init(&config.logging.level, cli.verbose, &sink);

    match cli.command {
        Commands::Run { path, dry_run } => {
            let ctx = validated_context(config, sink, dry_run)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_pipeline(ctx, &path))
        }
        Commands::Hook { dry_run } => {
            let source = hook::source_from_env().map_err(|e| {
                tracing::error!("{}", e);
                e
            })?;
            tracing::info!(source = %source.display(), "Invoked by torrent client");
            let ctx = validated_context(config, sink, dry_run)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_pipeline(ctx, &source))
        }
        Commands::Classify { path, json } => classify_path(&path, json),
        Commands::Check => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check(&config))
        }
        Commands::Validate => validate(&config, cli.config.as_deref()),
        Commands::Version => Ok(()),
    }
}

/// Configuration errors abort before any file is touched.
fn validated_context(
    config: config::Config,
    sink: LogSink,
    dry_run: bool,
) -> Result<PipelineContext> {
    if let Err(e) = config::validate_config(&config) {
        tracing::error!("{}", e);
        return Err(e.into());
    }
    Ok(PipelineContext::new(config, sink).with_dry_run(dry_run))
}

fn classify_path(path: &Path, json: bool) -> Result<()> {
    let batch = MediaBatch::discover(path)?;
    let result = classify::classify_batch(&batch)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Path: {}", path.display());
        println!("Files: {}", batch.len());
        println!("Category: {}", result.category);
        println!("  TV score: {}", result.tv_score);
        println!("  Movie score: {}", result.movie_score);
    }

    Ok(())
}

async fn check(config: &config::Config) -> Result<()> {
    println!("Checking rename engine and media server...\n");
    let mut all_ok = true;

    match resolve_engine(config.engine.path.as_deref()) {
        Ok(path) => {
            let info = probe_engine(&path);
            print!("✓ {}", info.program.display());
            if let Some(ref version) = info.version {
                print!(" ({})", version);
            }
            println!();
        }
        Err(e) => {
            all_ok = false;
            println!("✗ {}", e);
        }
    }

    if config.plex.url.trim().is_empty() {
        all_ok = false;
        println!("✗ plex.url is not set");
    } else {
        let notifier = PlexNotifier::new(&config.plex);
        match notifier.test_connection().await {
            Ok(true) => println!("✓ Plex at {}", config.plex.url),
            Ok(false) => {
                all_ok = false;
                println!("✗ Plex at {} rejected the token", config.plex.url);
            }
            Err(e) => {
                all_ok = false;
                println!("✗ Plex at {} unreachable: {}", config.plex.url, e);
            }
        }
    }

    println!();
    if all_ok {
        println!("Everything is reachable!");
        Ok(())
    } else {
        anyhow::bail!("some checks failed")
    }
}

fn validate(config: &config::Config, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("Validating config from default locations and environment"),
    }

    config::validate_config(config)?;

    println!("✓ Configuration is valid");
    println!("  Plex: {}", config.plex.url);
    println!(
        "  Sections: show={} movie={}",
        config.plex.show_section, config.plex.movie_section
    );
    println!("  Target root: {}", config.library.target_root.display());
    println!(
        "  Engine: {}",
        config
            .engine
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(PATH)".to_string())
    );
    println!(
        "  Log file: {}",
        config
            .logging
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(stderr only)".to_string())
    );
    println!(
        "  Stability window: {}s",
        config.readiness.stability_window_secs
    );
    println!(
        "  Junk extensions: {}",
        config.cleanup.junk_extensions.join(", ")
    );

    Ok(())
}
