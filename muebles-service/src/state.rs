//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::store::{DocumentStore, MemoryStore, StoreOperation};

/// Application state shared across handlers
///
/// Holds configuration and the store collaborator only; no request data is
/// shared between requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create state from a configuration and a store
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the document store
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Collection holding the furniture documents
    pub fn collection(&self) -> &str {
        &self.config.store.collection
    }
}

/// Builder for AppState
///
/// Without an explicit store, [`AppStateBuilder::build`] creates a
/// [`MemoryStore`] preloaded with `store.seed` from the configuration.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl AppStateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an existing store
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the AppState
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let store = match self.store {
            Some(store) => store,
            None => {
                let docs = config
                    .store
                    .seed
                    .iter()
                    .map(|mueble| mueble.to_document(StoreOperation::InsertOne))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                let seeded = docs.len();
                let store = MemoryStore::with_documents(&config.store.collection, docs).await;
                tracing::info!(
                    collection = %config.store.collection,
                    seeded,
                    "Using in-memory document store"
                );
                Arc::new(store) as Arc<dyn DocumentStore>
            }
        };

        Ok(AppState::new(config, store))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .field("backend", &self.store.backend())
            .field("collection", &self.collection())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mueble;

    #[tokio::test]
    async fn test_builder_defaults() {
        let state = AppState::builder().build().await.unwrap();
        assert_eq!(state.config().service.port, 3000);
        assert_eq!(state.collection(), "muebles");
        assert_eq!(state.store().backend(), "memory");
    }

    #[tokio::test]
    async fn test_builder_seeds_memory_store() {
        let mut config = Config::default();
        config.store.seed = vec![Mueble {
            codigo: 1,
            nombre: "Mesa".to_string(),
            precio: 150.0,
            categoria: "Comedor".to_string(),
        }];
        let state = AppState::builder().config(config).build().await.unwrap();

        let coll = state.store().connect(state.collection()).await.unwrap();
        let found = coll
            .find_one(&crate::store::Filter::eq("codigo", 1))
            .await
            .unwrap();
        coll.disconnect().await.unwrap();
        assert_eq!(found.unwrap()["nombre"], "Mesa");
    }

    #[tokio::test]
    async fn test_builder_keeps_given_store() {
        let store = MemoryStore::new();
        let state = AppState::builder()
            .store(Arc::new(store.clone()))
            .build()
            .await
            .unwrap();
        let coll = state.store().connect("muebles").await.unwrap();
        coll.disconnect().await.unwrap();
        assert_eq!(store.connect_count(), 1);
    }
}
