//! Kanwiki: a Kanban board kept in a TiddlyWiki-style document store.
//!
//! A board, its columns and its cards are ordinary documents in the remote
//! store. This crate assembles them into an in-memory board, applies card
//! reorders, moves, creations, edits and deletions locally, and reconciles
//! each change back to the store.
//!
//! # Architecture
//!
//! Kanwiki follows hexagonal architecture principles:
//!
//! - **Domain**: Board state and document encoding, free of I/O
//! - **Ports**: The [`board::ports::TiddlerStore`] trait for store access
//! - **Adapters**: HTTP and in-memory store implementations
//! - **Services**: Board assembly, reconciliation and the board session
//!
//! # Modules
//!
//! - [`board`]: Board model, store access and reconciliation
//! - [`config`]: Layered store connection settings

pub mod board;
pub mod config;
