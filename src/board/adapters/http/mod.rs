//! HTTP adapter for the document store's REST interface.

mod client;

pub use client::HttpTiddlerStore;
