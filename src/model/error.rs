//! Error types for pagesel.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions into [`AppError`].
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the binary
//!   - [`SourceError`] - Record files could not be read or decoded
//!   - [`SaveError`] - The save collaborator failed
//!   - [`ConfigError`](crate::config::ConfigError) - Config file problems
//!   - [`LoggingError`](crate::logging::LoggingError) - Subscriber setup
//!   - `std::io::Error` - Terminal failures
//!
//! # Scoping
//!
//! [`FetchError`] never reaches `AppError`: it is stored on the cursor that
//! issued the failed request and surfaced as a dismissible banner with a retry.
//! Stale completions are not errors at all; see
//! [`CompletionOutcome`](crate::state::fetch_cursor::CompletionOutcome).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to load records or the initial selection.
    #[error("Failed to load records: {0}")]
    Source(#[from] SourceError),

    /// Failed to persist the selection.
    #[error("Failed to save selection: {0}")]
    Save(#[from] SaveError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Fatal: without a working terminal the list cannot be shown.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// A fetch collaborator failure.
///
/// Scoped to the cursor that issued the request. The cursor keeps its
/// `next_offset`, so a retry asks for exactly the same page again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network or transport failure.
    ///
    /// **Recovery**: show the failure banner; the user may retry.
    #[error("Fetch at offset {offset} failed: {reason}")]
    Transport {
        /// Offset that was being fetched.
        offset: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// The collaborator answered with something that is not a page.
    #[error("Malformed fetch response at offset {offset}: {reason}")]
    Malformed {
        /// Offset that was being fetched.
        offset: usize,
        /// Decoder message.
        reason: String,
    },
}

impl FetchError {
    /// Transport failure at `offset`.
    pub fn transport(offset: usize, reason: impl Into<String>) -> Self {
        Self::Transport {
            offset,
            reason: reason.into(),
        }
    }

    /// Offset of the failed request.
    pub fn offset(&self) -> usize {
        match self {
            Self::Transport { offset, .. } | Self::Malformed { offset, .. } => *offset,
        }
    }
}

/// Errors from the save collaborator.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Writing the selection failed.
    #[error("Failed to write selection to {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The selection could not be serialized.
    #[error("Failed to encode selection: {0}")]
    Encode(#[from] serde_json::Error),

    /// The collaborator rejected the selection.
    #[error("Selection rejected: {0}")]
    Rejected(String),
}

/// Errors loading record files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Reading failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded.
    ///
    /// `line` is 1-based for JSON Lines input and 0 for a JSON array document.
    #[error("Invalid record in {path} at line {line}: {message}")]
    InvalidRecord {
        /// File being decoded.
        path: PathBuf,
        /// Line number (1-based), 0 when not line oriented.
        line: usize,
        /// Decoder message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn fetch_error_transport_display_includes_offset_and_reason() {
        let err = FetchError::transport(20, "connection reset");
        let msg = err.to_string();
        assert!(msg.contains("offset 20"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn fetch_error_offset_is_reported_for_every_variant() {
        assert_eq!(FetchError::transport(3, "x").offset(), 3);
        let malformed = FetchError::Malformed {
            offset: 7,
            reason: "missing count".to_string(),
        };
        assert_eq!(malformed.offset(), 7);
    }

    #[test]
    fn source_error_invalid_record_display() {
        let err = SourceError::InvalidRecord {
            path: PathBuf::from("/tmp/records.jsonl"),
            line: 42,
            message: "missing field `_id`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 42"));
        assert!(msg.contains("/tmp/records.jsonl"));
        assert!(msg.contains("`_id`"));
    }

    #[test]
    fn save_error_write_display_includes_path() {
        let err = SaveError::Write {
            path: PathBuf::from("/tmp/out.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/out.json"));
    }

    #[test]
    fn app_error_from_source_error() {
        let err: AppError = SourceError::FileNotFound {
            path: PathBuf::from("missing.json"),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to load records"));
        assert!(msg.contains("missing.json"));
    }

    #[test]
    fn app_error_from_save_error() {
        let err: AppError = SaveError::Rejected("read only".to_string()).into();
        assert!(err.to_string().contains("read only"));
    }

    #[test]
    fn app_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let app_err: AppError = io_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Terminal error"));
        assert!(msg.contains("pipe broken"));
    }
}
