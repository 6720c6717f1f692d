//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for devtask operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TaskError {
    /// Configuration Error - missing or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Command Error - a fail-fast invocation failed
    #[error("Command error: {message}")]
    Command { message: String },

    /// Filesystem Error - one or more removals failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl TaskError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Command { .. } => 3,
            Self::Filesystem { .. } => 5,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a command error
    #[inline]
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
