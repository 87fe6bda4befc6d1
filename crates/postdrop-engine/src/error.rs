pub type Result<T> = std::result::Result<T, Error>;

/// Failures to launch the rename engine or to see it finish.
///
/// A run that *completes* is never an error, whatever its exit status; see
/// [`crate::OutputSummary`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine not found: {program}")]
    EngineNotFound { program: String },

    /// Spawning or waiting on the engine process failed.
    #[error("could not run {program}: {message}")]
    LaunchFailed { program: String, message: String },

    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn engine_not_found(program: impl Into<String>) -> Self {
        Self::EngineNotFound {
            program: program.into(),
        }
    }

    pub fn launch_failed(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LaunchFailed {
            program: program.into(),
            message: message.into(),
        }
    }
}
