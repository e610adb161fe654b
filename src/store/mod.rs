//! Document store client subsystem.
//!
//! # Data Flow
//! ```text
//! store.uri (config / CRISIS_CORNER_STORE_URI / MONGO_URI)
//!     → uri.rs (parse connection string)
//!     → handle.rs (connect once, share via Arc)
//!     → memory.rs (in-process collection, optional JSON snapshot)
//!       or mongo.rs (MongoDB `requests` collection)
//!
//! Request Service
//!     → StoreHandle::find / insert_one / update_one
//!     → DocumentStore implementation
//!
//! Shutdown:
//!     StoreHandle::close → flush
//! ```
//!
//! # Design Decisions
//! - The Request Service only sees the `DocumentStore` trait; backends are
//!   chosen by connection-string scheme
//! - One handle per process, cloned into every request
//! - Single-document atomicity only; no multi-document transactions

pub mod error;
pub mod handle;
pub mod memory;
pub mod mongo;
pub mod uri;

use async_trait::async_trait;

use crate::requests::types::{
    InsertOneResult, ItemRequest, NewItemRequest, RecordId, Status, StatusChange, UpdateResult,
};

pub use error::{StoreError, StoreResult};
pub use handle::StoreHandle;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use uri::StoreUri;

/// Document selection for `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Status(Status),
}

impl Filter {
    pub fn matches(&self, doc: &ItemRequest) -> bool {
        match self {
            Filter::All => true,
            Filter::Status(status) => doc.status == *status,
        }
    }
}

/// Page window for `find`. Results are always ordered newest `createdDate`
/// first, ties broken by descending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: u64,
    pub limit: u64,
}

/// Primitive operations a backend must provide.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Filtered, sorted, paginated read.
    async fn find(&self, filter: Filter, options: FindOptions) -> StoreResult<Vec<ItemRequest>>;

    /// Persist a new document and assign it an id.
    async fn insert_one(&self, doc: NewItemRequest) -> StoreResult<InsertOneResult>;

    /// Apply a status change to the document with `id`. Never inserts.
    async fn update_one(&self, id: RecordId, change: StatusChange) -> StoreResult<UpdateResult>;

    /// Push any buffered state to durable storage.
    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}
