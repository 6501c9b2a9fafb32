//! Error types for the AI toolkit.
//!
//! Library crates use [`ToolkitError`] via `thiserror`.
//! App crates (rag/newsletter) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all toolkit operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to a feed, the model API, or the index.
    #[error("network error: {0}")]
    Network(String),

    /// Feed or response body parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Language model API error (non-success status, empty completion, ...).
    #[error("llm error: {0}")]
    Llm(String),

    /// Vector index error (collection lifecycle, add, query).
    #[error("index error: {0}")]
    Index(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ToolkitError>;

impl ToolkitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ToolkitError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = ToolkitError::Index("collection ai_toolkit not found".into());
        assert!(err.to_string().starts_with("index error:"));
        assert!(err.to_string().contains("ai_toolkit"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = ToolkitError::io(
            "/tmp/newsletter.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("newsletter.html"));
    }
}
