//! In-memory adapter implementations for testing.
//!
//! The store keeps documents in a map and answers filtered queries with the
//! same semantics as the remote store, so services can be exercised without
//! a network.

mod store;

pub use store::InMemoryTiddlerStore;
