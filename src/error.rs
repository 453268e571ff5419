use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the record store.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures the record store reports back to its caller. None of these are
/// fatal; the TUI shows them in the footer and keeps running.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{name}' already exists.")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{0}")]
    Referential(String),

    #[error("{kind} '{name}' not found.")]
    NotFound { kind: &'static str, name: String },

    #[error("'{value}' means every {field} in filters and cannot be used as one.")]
    Reserved { field: &'static str, value: String },

    #[error("No {kind} ids left to assign.")]
    IdsExhausted { kind: &'static str },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        StoreError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
