use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postdrop")]
#[command(author, version, about = "Post-download media pipeline")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a finished download directory or a single video file
    Run {
        /// Download to process
        #[arg(required = true)]
        path: PathBuf,

        /// Simulate renames; delete, prune and rescan nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Process the download named by TR_TORRENT_DIR and TR_TORRENT_NAME
    Hook {
        /// Simulate renames; delete, prune and rescan nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Classify a download as TV or movie from its filenames
    Classify {
        /// Directory or file to classify
        #[arg(required = true)]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the rename engine and the media server connection
    Check,

    /// Validate configuration file
    Validate,

    /// Display version information
    Version,
}
