//! Error types for the queue engine and its fixtures.

use thiserror::Error;

/// Errors reported by fallible queue operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An element, its string value or a ghost link could not be allocated.
    /// The queue involved is left unchanged.
    #[error("allocation failed")]
    AllocFailed,

    /// `merge_all` was called on a group without any queue.
    #[error("cannot merge an empty queue group")]
    EmptyGroup,

    /// A non-cyclic cursor move would pass through the ghost node.
    #[error("cursor move across ghost boundary")]
    GhostBoundary,

    #[error("corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus file ended before every string was read.
    #[error("corpus file ended early after {read} strings")]
    ShortRead { read: usize },
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, Error>;
