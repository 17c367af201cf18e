//! Error types for the core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building tokens or loading a hierarchy.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid entity token '{0}': expected type:source:id")]
    InvalidToken(String),

    #[error("failed to read hierarchy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed hierarchy: {0}")]
    Json(#[from] serde_json::Error),

    #[error("entity token '{0}' is declared more than once")]
    DuplicateEntry(String),

    #[error("the null entity token cannot be declared in a hierarchy")]
    NullEntry,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
