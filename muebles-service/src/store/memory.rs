//! In-process document store
//!
//! Keeps every collection as an insertion-ordered `Vec<Document>` behind an
//! async `RwLock`. Handles are counted so callers can observe that each
//! `connect` is paired with a `disconnect`. Faults can be queued per
//! operation to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::error::{StoreError, StoreOperation, StoreResult};
use super::filter::{Document, Filter, FindOptions};
use super::{Collection, DocumentStore};

#[derive(Default)]
struct Inner {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    faults: Mutex<Vec<StoreOperation>>,
    open: AtomicUsize,
    connects: AtomicU64,
    disconnects: AtomicU64,
}

impl Inner {
    async fn take_fault(&self, operation: StoreOperation) -> StoreResult<()> {
        let mut faults = self.faults.lock().await;
        if let Some(pos) = faults.iter().position(|op| *op == operation) {
            faults.remove(pos);
            return Err(StoreError::connection_failed(
                operation,
                "injected fault: backend unavailable",
            ));
        }
        Ok(())
    }
}

/// In-memory [`DocumentStore`]
///
/// Cloning is cheap; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `docs` already present in `collection`
    pub async fn with_documents(collection: &str, docs: Vec<Document>) -> Self {
        let store = Self::new();
        store
            .inner
            .collections
            .write()
            .await
            .insert(collection.to_string(), docs);
        store
    }

    /// Snapshot of `collection` in natural order
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next call of `operation` fail with a connection error
    pub async fn fail_next(&self, operation: StoreOperation) {
        self.inner.faults.lock().await.push(operation);
    }

    /// Number of handles currently alive
    pub fn open_connections(&self) -> usize {
        self.inner.open.load(Ordering::SeqCst)
    }

    /// Total successful `connect` calls
    pub fn connect_count(&self) -> u64 {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Total `disconnect` calls
    pub fn disconnect_count(&self) -> u64 {
        self.inner.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn connect(&self, collection: &str) -> StoreResult<Box<dyn Collection>> {
        self.inner
            .take_fault(StoreOperation::Connect)
            .await
            .map_err(|e| e.with_collection(collection))?;

        self.inner.open.fetch_add(1, Ordering::SeqCst);
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(collection, "memory store handle opened");

        Ok(Box::new(MemoryCollection {
            name: collection.to_string(),
            inner: Arc::clone(&self.inner),
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.take_fault(StoreOperation::Ping).await
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct MemoryCollection {
    name: String,
    inner: Arc<Inner>,
}

impl MemoryCollection {
    async fn check(&self, operation: StoreOperation) -> StoreResult<()> {
        self.inner
            .take_fault(operation)
            .await
            .map_err(|e| e.with_collection(&self.name))
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        self.check(StoreOperation::FindOne).await?;
        let matcher = filter
            .compile(StoreOperation::FindOne)
            .map_err(|e| e.with_collection(&self.name))?;

        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(&self.name)
            .and_then(|docs| docs.iter().find(|doc| matcher.matches(doc)))
            .cloned())
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>> {
        self.check(StoreOperation::Find).await?;
        let matcher = filter
            .compile(StoreOperation::Find)
            .map_err(|e| e.with_collection(&self.name))?;

        let mut found: Vec<Document> = {
            let collections = self.inner.collections.read().await;
            collections
                .get(&self.name)
                .map(|docs| docs.iter().filter(|doc| matcher.matches(doc)).cloned().collect())
                .unwrap_or_default()
        };

        // stable sort keeps natural order among equal keys
        if let Some(ref sort) = options.sort {
            found.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = options.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn insert_one(&self, doc: Document) -> StoreResult<()> {
        self.check(StoreOperation::InsertOne).await?;
        let mut collections = self.inner.collections.write().await;
        collections.entry(self.name.clone()).or_default().push(doc);
        Ok(())
    }

    async fn update_one(&self, filter: &Filter, set: Document) -> StoreResult<u64> {
        self.check(StoreOperation::UpdateOne).await?;
        let matcher = filter
            .compile(StoreOperation::UpdateOne)
            .map_err(|e| e.with_collection(&self.name))?;

        let mut collections = self.inner.collections.write().await;
        let Some(target) = collections
            .get_mut(&self.name)
            .and_then(|docs| docs.iter_mut().find(|doc| matcher.matches(doc)))
        else {
            return Ok(0);
        };
        for (field, value) in set {
            target.insert(field, value);
        }
        Ok(1)
    }

    async fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        self.check(StoreOperation::DeleteOne).await?;
        let matcher = filter
            .compile(StoreOperation::DeleteOne)
            .map_err(|e| e.with_collection(&self.name))?;

        let mut collections = self.inner.collections.write().await;
        let Some(docs) = collections.get_mut(&self.name) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| matcher.matches(doc)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn disconnect(self: Box<Self>) -> StoreResult<()> {
        self.inner.disconnects.fetch_add(1, Ordering::SeqCst);
        self.check(StoreOperation::Disconnect).await
    }
}

impl Drop for MemoryCollection {
    fn drop(&mut self) {
        self.inner.open.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(collection = %self.name, "memory store handle released");
    }
}
