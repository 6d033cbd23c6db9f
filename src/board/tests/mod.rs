//! Unit tests for the board module.
//!
//! Tests are organised by component: list-field encoding, document shape,
//! board state, the in-memory store, assembly, and reconciliation (against
//! the in-memory store and against mocked store failures).
