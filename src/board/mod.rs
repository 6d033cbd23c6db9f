//! Kanban board reconciliation against a wiki-style document store.
//!
//! A board is assembled from three kinds of remote documents: the board
//! structure item (whose list field orders the columns), the column items
//! tagged with the board name (whose list fields order the cards), and the
//! card items themselves. Local drag-and-drop edits mutate a single
//! in-memory [`domain::Board`] and are persisted back by re-encoding list
//! fields. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
