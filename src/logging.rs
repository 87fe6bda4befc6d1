//! Log sink and subscriber setup.
//!
//! Diagnostics go to stderr and to an append-only log file that is reopened
//! for every write. Reopening per write keeps the file
//! usable by concurrent invocations and by external rotation.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Append-only handle to the shared log file.
///
/// A sink without a path hands raw blocks to tracing at debug level instead.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    path: Option<PathBuf>,
}

impl LogSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// A sink that writes nowhere.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn open(&self) -> io::Result<Option<std::fs::File>> {
        match self.path {
            Some(ref path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Append a titled block of raw text, such as an engine transcript.
    ///
    /// Failures are reported through tracing and otherwise ignored; losing a
    /// transcript must not fail the pipeline.
    pub fn append_block(&self, title: &str, body: &str) {
        let result = self.open().and_then(|file| match file {
            Some(mut file) => {
                let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                writeln!(file, "----- {} [{}] -----", title, stamp)?;
                file.write_all(body.as_bytes())?;
                if !body.ends_with('\n') {
                    writeln!(file)?;
                }
                writeln!(file, "----- end {} -----", title)
            }
            None => {
                tracing::debug!(target: "postdrop::transcript", title, "{}", body.trim_end());
                Ok(())
            }
        });

        if let Err(e) = result {
            tracing::warn!("Failed to append to log file: {}", e);
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.open() {
            Ok(Some(file)) => Box::new(file),
            _ => Box::new(io::sink()),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to postdrop crates,
/// raised to `trace` by `verbose`.
pub fn init(level: &str, verbose: bool, sink: &LogSink) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "postdrop=trace,postdrop_engine=trace,postdrop_common=debug,reqwest=debug".to_string()
        } else {
            format!("postdrop={level},postdrop_engine={level},postdrop_common={level},warn")
        }
    });

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let file_layer = sink.path().map(|_| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(sink.clone())
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}
