//! Process-wide store handle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::requests::types::{
    InsertOneResult, ItemRequest, NewItemRequest, RecordId, StatusChange, UpdateResult,
};
use crate::store::error::{StoreError, StoreResult};
use crate::store::memory::MemoryStore;
use crate::store::mongo::MongoStore;
use crate::store::uri::StoreUri;
use crate::store::{DocumentStore, Filter, FindOptions};

/// Owned connection to the document store.
///
/// Created once at startup and cloned into every request. Each call is
/// bounded by the configured timeout.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl StoreHandle {
    /// Connect to the store named by the configured URI.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let uri = StoreUri::parse(&config.uri)?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let store: Arc<dyn DocumentStore> = match &uri {
            StoreUri::Memory => Arc::new(MemoryStore::new()),
            StoreUri::File(path) => Arc::new(MemoryStore::open(path).await?),
            StoreUri::Mongo(raw) => Arc::new(MongoStore::connect(raw, timeout).await?),
        };

        tracing::info!(uri = %uri, timeout_ms = config.timeout_ms, "Store connected");
        Ok(Self::from_store(store, timeout))
    }

    /// Wrap an already-connected store.
    pub fn from_store(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    pub async fn find(&self, filter: Filter, options: FindOptions) -> StoreResult<Vec<ItemRequest>> {
        self.bounded(self.store.find(filter, options)).await
    }

    pub async fn insert_one(&self, doc: NewItemRequest) -> StoreResult<InsertOneResult> {
        self.bounded(self.store.insert_one(doc)).await
    }

    pub async fn update_one(&self, id: RecordId, change: StatusChange) -> StoreResult<UpdateResult> {
        self.bounded(self.store.update_one(id, change)).await
    }

    /// Flush buffered state. Called once at shutdown.
    pub async fn close(&self) -> StoreResult<()> {
        self.bounded(self.store.flush()).await?;
        tracing::info!("Store closed");
        Ok(())
    }
}
