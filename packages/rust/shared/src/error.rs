//! Error types for blogcards.
//!
//! Library crates use [`BlogCardsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all blogcards operations.
#[derive(Debug, thiserror::Error)]
pub enum BlogCardsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Document, frontmatter, or inline fragment failed to parse.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (serialization, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogCardsError>;

impl BlogCardsError {
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
        let err = BlogCardsError::config("invalid glob pattern");
        assert_eq!(err.to_string(), "config error: invalid glob pattern");

        let err = BlogCardsError::parse("frontmatter is not a mapping");
        assert!(err.to_string().starts_with("parse error:"));
    }

    #[test]
    fn io_error_mentions_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BlogCardsError::io("posts/a.md", source);
        let msg = err.to_string();
        assert!(msg.contains("posts/a.md"));
        assert!(msg.contains("gone"));
    }
}
