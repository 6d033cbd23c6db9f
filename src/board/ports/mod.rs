//! Port contracts for board reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod store;

#[cfg(test)]
pub use store::MockTiddlerStore;
pub use store::{StoreOperation, TiddlerStore, TiddlerStoreError, TiddlerStoreResult};
