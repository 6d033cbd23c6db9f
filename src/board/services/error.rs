//! Service-level errors for board assembly and reconciliation.

use crate::board::{
    domain::{BoardDomainError, CardTitle, ColumnId},
    ports::TiddlerStoreError,
};
use crate::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Result type for board services.
pub type BoardResult<T> = Result<T, BoardError>;

/// Assembly stage whose remote request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyStage {
    /// Fetching the board-structure document.
    Structure,
    /// Querying the documents tagged with the board name.
    ColumnSet,
    /// Querying the card summaries of one column.
    ColumnCards(ColumnId),
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => f.write_str("board structure"),
            Self::ColumnSet => f.write_str("column set"),
            Self::ColumnCards(column) => write!(f, "cards of column {column}"),
        }
    }
}

/// Step of a cross-column move that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStep {
    /// Persisting the source column's order.
    SourceOrder,
    /// Persisting the target column's order.
    TargetOrder,
    /// Writing the card's updated tags.
    CardTags,
}

impl fmt::Display for MoveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceOrder => "source column order",
            Self::TargetOrder => "target column order",
            Self::CardTags => "card tags",
        })
    }
}

/// Errors returned by board services.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// The store connection is not configured.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A fetched document lacks a field the board model needs.
    #[error("document '{title}' has no '{field}' field")]
    Structure {
        /// Title of the document.
        title: String,
        /// Missing field name.
        field: &'static str,
    },

    /// A store request failed.
    #[error(transparent)]
    Remote(#[from] TiddlerStoreError),

    /// A card with the requested title already exists in the store.
    #[error("card '{0}' already exists")]
    Duplicate(CardTitle),

    /// Local state rejected the mutation.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// Board assembly failed at one of its remote stages.
    #[error("failed to load {stage}: {source}")]
    Assembly {
        /// Stage that failed.
        stage: AssemblyStage,
        /// Underlying store error.
        source: TiddlerStoreError,
    },

    /// A cross-column move stopped part-way; earlier steps stay committed.
    #[error("move interrupted while writing {step}: {source}")]
    MoveInterrupted {
        /// Step that failed.
        step: MoveStep,
        /// Underlying store error.
        source: TiddlerStoreError,
    },
}

impl BoardError {
    /// Returns the store error behind a remote failure, if any.
    #[must_use]
    pub const fn store_error(&self) -> Option<&TiddlerStoreError> {
        match self {
            Self::Remote(source)
            | Self::Assembly { source, .. }
            | Self::MoveInterrupted { source, .. } => Some(source),
            Self::Configuration(_) | Self::Structure { .. } | Self::Duplicate(_) | Self::Domain(_) => {
                None
            }
        }
    }
}
