//! Error types for the gazette analyzer.
//!
//! Library crates use [`GazetteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all gazette operations.
#[derive(Debug, thiserror::Error)]
pub enum GazetteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Document could not be decoded as UTF-8 text.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Markup could not be read as a gazette document.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Registry snapshot exists but could not be loaded.
    #[error("registry error: {0}")]
    Registry(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad date, unknown format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Report rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// A batch produced no relevant records across all of its documents.
    #[error("no relevant records in batch ({} document issue(s))", issues.len())]
    NothingUsable { issues: Vec<String> },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GazetteError>;

impl GazetteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
