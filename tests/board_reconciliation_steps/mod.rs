//! Step definitions for board reconciliation scenarios.

pub mod then;
pub mod world;
