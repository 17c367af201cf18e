//! Error types for graph construction and expansion.

use c1_core::EntityToken;
use thiserror::Error;

/// Errors raised by the relationship graphs.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph was asked to start from the null token.
    #[error("source entity token must not be null")]
    NullSourceToken,

    /// Expansion passed the level bound.
    #[error(
        "the entity token '{token}' has more than {levels} levels of parents, this might be an infinite loop"
    )]
    ProbableInfiniteLoop { token: EntityToken, levels: usize },
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
