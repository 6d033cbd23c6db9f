//! Document store port: item reads, writes, deletes and filtered queries.

use crate::board::domain::Tiddler;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for document store operations.
pub type TiddlerStoreResult<T> = Result<T, TiddlerStoreError>;

/// Remote document store contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TiddlerStore: Send + Sync {
    /// Fetches a full document by title.
    ///
    /// # Errors
    ///
    /// Returns [`TiddlerStoreError::NotFound`] when the document does not
    /// exist, or another [`TiddlerStoreError`] when the request fails.
    async fn get_tiddler(&self, title: &str) -> TiddlerStoreResult<Tiddler>;

    /// Replaces the document titled `tiddler.title` with `tiddler`.
    ///
    /// # Errors
    ///
    /// Returns [`TiddlerStoreError::Remote`] when the store rejects the write.
    async fn put_tiddler(&self, tiddler: &Tiddler) -> TiddlerStoreResult<()>;

    /// Deletes a document by title.
    ///
    /// # Errors
    ///
    /// Returns [`TiddlerStoreError::Remote`] when the store rejects the
    /// delete.
    async fn delete_tiddler(&self, title: &str) -> TiddlerStoreResult<()>;

    /// Returns every document tagged with `tag`, in skinny form.
    ///
    /// # Errors
    ///
    /// Returns a [`TiddlerStoreError`] when the query fails.
    async fn query_by_tag(&self, tag: &str) -> TiddlerStoreResult<Vec<Tiddler>>;

    /// Returns the documents named by the list field of `container`, in
    /// skinny form.
    ///
    /// # Errors
    ///
    /// Returns a [`TiddlerStoreError`] when the query fails.
    async fn query_by_list(&self, container: &str) -> TiddlerStoreResult<Vec<Tiddler>>;
}

/// Kind of store request, reported in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Single-document read.
    Get,
    /// Full-document replace.
    Put,
    /// Document delete.
    Delete,
    /// Filtered query.
    Query,
}

impl StoreOperation {
    /// Returns the lowercase operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, Error)]
pub enum TiddlerStoreError {
    /// The document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The store answered with a non-success status.
    #[error("{operation} '{target}' failed with HTTP status {status}")]
    Remote {
        /// Request kind.
        operation: StoreOperation,
        /// Document title or filter expression.
        target: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be delivered or the response not read.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body was not a valid document.
    #[error("decode error: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),
}

impl TiddlerStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a decode error.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// Returns whether the error reports a missing document.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
