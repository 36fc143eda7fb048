//! Error type for chunk operations
//!
//! Structural damage in a buffer never surfaces here: the decoder swaps in a
//! junk chunk instead. These errors come from typed access to a chunk tree
//! that lacks what the caller needs.

use super::tag::Tag;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiffError {
    /// A required child chunk is absent from a container
    #[error("Missing required chunk: '{tag}'")]
    MissingChunk { tag: Tag },

    /// A typed view was requested over a chunk with another tag
    #[error("Expected chunk '{expected}', found '{found}'")]
    UnexpectedTag { expected: Tag, found: Tag },

    /// Payload too short for the fixed layout of its tag
    #[error("Chunk '{tag}' is truncated: need {needed} bytes, have {available}")]
    Truncated {
        tag: Tag,
        needed: usize,
        available: usize,
    },

    /// Container operation on a chunk that has no children
    #[error("Chunk '{tag}' is not a container")]
    NotAContainer { tag: Tag },

    /// Payload longer than the 32-bit length field can describe
    #[error("Chunk '{tag}' payload of {size} bytes does not fit a 32-bit length")]
    TooLarge { tag: Tag, size: usize },
}

/// Result type for chunk operations
pub type RiffResult<T> = Result<T, RiffError>;
