//! Error types for board domain validation and state mutation.

use super::{CardTitle, ColumnId};
use thiserror::Error;

/// Result type for board state mutations.
pub type BoardDomainResult<T> = Result<T, BoardDomainError>;

/// Errors returned while constructing identifiers or mutating board state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A required identifier was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// The referenced column is not part of the board.
    #[error("unknown column: {0}")]
    UnknownColumn(ColumnId),

    /// The referenced card is not part of the board.
    #[error("unknown card: {0}")]
    UnknownCard(CardTitle),

    /// A card identity would appear twice on the board.
    #[error("card {0} already exists on the board")]
    DuplicateCard(CardTitle),

    /// A card position is outside the column.
    #[error("position {position} is out of range for a column of {len} cards")]
    PositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of cards in the column.
        len: usize,
    },
}
