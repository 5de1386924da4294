//! Error types for the tint IR.

use crate::arena::ArenaId;

/// Errors returned by fallible IR lookups.
///
/// Structural misuse on the infallible paths (indexing an arena with a
/// foreign handle, cloning a node with a missing required child) panics
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// A handle index is out of bounds for its arena.
    #[error("handle index {index} out of bounds (arena size: {size})")]
    BadHandle { index: usize, size: usize },

    /// A handle was issued by a different (or since reset) arena.
    #[error("handle index {index} belongs to arena {owner}, not {arena}")]
    ForeignHandle {
        index: usize,
        owner: ArenaId,
        arena: ArenaId,
    },

    /// A symbol was not registered in the queried table.
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
}
