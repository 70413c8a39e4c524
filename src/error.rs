//! Error types for fcm-sweep
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// fcm-sweep error types
#[derive(Error, Debug)]
pub enum Error {
    /// The external executable could not be located
    #[error("Executable not found: {program}\nBuild the model tools or point the configuration at the right binary")]
    ExecutableNotFound {
        /// Program name or path as it was invoked
        program: String,
    },

    /// The external executable ran but reported failure
    #[error("{program} exited with status {code}{}", fmt_stderr(.stderr))]
    NonZeroExit {
        /// Program name or path as it was invoked
        program: String,
        /// Exit code (-1 when the process was terminated by a signal)
        code: i32,
        /// Captured standard error, if any
        stderr: String,
    },

    /// The external executable could not be started
    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        /// Program name or path as it was invoked
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument or parameter value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration file could not be used
    #[error("Configuration error in {path}: {message}\nCheck the JSON keys against the recognised sweep options")]
    Config {
        /// Configuration file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A trained model artifact is missing or could not be relocated
    #[error("Model artifact error at {path}: {message}")]
    Artifact {
        /// Artifact path involved
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Plot rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl Error {
    /// Whether this error came from invoking an external tool.
    ///
    /// These are recoverable per grid point: the sweep records "no data"
    /// and moves on.
    #[must_use]
    pub const fn is_process_failure(&self) -> bool {
        matches!(
            self,
            Self::ExecutableNotFound { .. } | Self::NonZeroExit { .. } | Self::LaunchFailed { .. }
        )
    }

    /// Whether this error was caused by user-supplied arguments or config.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Config { .. })
    }
}
