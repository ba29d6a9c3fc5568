//! Document store collaborator
//!
//! The request-handling core talks to its backing database only through the
//! traits in this module. A backend hands out a fresh [`Collection`] handle per
//! request via [`DocumentStore::connect`]; the handle must be released with
//! [`Collection::disconnect`] once the request is done (see
//! [`crate::envelope`]).
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process store with natural insertion order, used for
//!   local runs and tests

use async_trait::async_trait;

pub mod error;
pub mod filter;
pub mod memory;

pub use error::{StoreError, StoreErrorKind, StoreOperation, StoreResult};
pub use filter::{Document, Filter, FindOptions, Matcher, SortDirection, SortSpec};
pub use memory::MemoryStore;

/// Connection factory for a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a handle on `collection`
    async fn connect(&self, collection: &str) -> StoreResult<Box<dyn Collection>>;

    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name used in logs and readiness output
    fn backend(&self) -> &'static str;
}

/// A connected handle on one collection
#[async_trait]
pub trait Collection: Send + Sync {
    /// Name of the collection this handle is bound to
    fn name(&self) -> &str;

    /// First document matching `filter`, in natural order
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// All documents matching `filter`, ordered and capped by `options`
    async fn find(&self, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>>;

    /// Insert a new document
    async fn insert_one(&self, doc: Document) -> StoreResult<()>;

    /// Overwrite the fields in `set` on the first document matching `filter`.
    ///
    /// Returns the number of matched documents (0 or 1).
    async fn update_one(&self, filter: &Filter, set: Document) -> StoreResult<u64>;

    /// Remove the first document matching `filter`.
    ///
    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, filter: &Filter) -> StoreResult<u64>;

    /// Release the handle
    async fn disconnect(self: Box<Self>) -> StoreResult<()>;
}
