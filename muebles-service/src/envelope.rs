//! Per-request store scope
//!
//! [`with_collection`] opens a fresh collection handle, runs the request's
//! unit of work against it and releases the handle on every exit path: normal
//! return, early `Err`, or panic. A failed release is logged and never
//! replaces the outcome of the work itself.
//!
//! ```rust,ignore
//! let mueble = with_collection(store, "muebles", |coll| {
//!     Box::pin(async move {
//!         let doc = coll.find_one(&Filter::eq("codigo", 1)).await?;
//!         Ok::<_, Error>(doc)
//!     })
//! })
//! .await?;
//! ```

use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::Result;
use crate::store::{Collection, DocumentStore};

/// Run `work` against a freshly connected `collection`, always disconnecting
pub async fn with_collection<T, F>(store: &dyn DocumentStore, collection: &str, work: F) -> Result<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c dyn Collection) -> BoxFuture<'c, Result<T>>,
{
    let handle = store.connect(collection).await?;
    tracing::trace!(collection, backend = store.backend(), "Store handle acquired");

    let outcome = AssertUnwindSafe(async { work(handle.as_ref()).await })
        .catch_unwind()
        .await;

    if let Err(e) = handle.disconnect().await {
        tracing::warn!(
            operation = %e.operation,
            kind = %e.kind,
            collection,
            "Failed to release store handle: {}", e.message
        );
    } else {
        tracing::trace!(collection, "Store handle released");
    }

    match outcome {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
