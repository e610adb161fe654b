//! In-process document store with optional JSON snapshot persistence.
//!
//! A snapshot commit rewrites the whole collection while holding the commit
//! lock, so each create or modifying update costs O(n) in the collection size
//! and commits are serialized. Suited to the modest volumes of a single
//! relief site; larger deployments should use the `mongodb://` backend.

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::requests::types::{
    InsertOneResult, ItemRequest, NewItemRequest, RecordId, StatusChange, UpdateResult,
};
use crate::store::error::StoreResult;
use crate::store::{DocumentStore, Filter, FindOptions};

/// Snapshot file plus the lock that serializes commits against it.
struct Snapshot {
    path: PathBuf,
    commit: Mutex<()>,
}

impl Snapshot {
    async fn write(&self, docs: &[ItemRequest]) -> StoreResult<()> {
        let json = serde_json::to_vec(docs)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// A thread-safe collection of request documents.
///
/// With a snapshot attached, every mutation is written to the snapshot file
/// before it becomes visible, so a failed write leaves the collection as it
/// was. Commits run on their own task: a caller that stops waiting (timeout,
/// disconnect) cannot leave the file and the collection disagreeing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<DashMap<RecordId, ItemRequest>>,
    snapshot: Option<Arc<Snapshot>>,
}

impl MemoryStore {
    /// Create an empty, non-durable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a snapshot-backed store, loading the snapshot if it exists.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let docs = DashMap::new();

        if tokio::fs::try_exists(path).await? {
            let bytes = tokio::fs::read(path).await?;
            let loaded: Vec<ItemRequest> = serde_json::from_slice(&bytes)?;
            for doc in loaded {
                docs.insert(doc.id, doc);
            }
            tracing::info!(path = %path.display(), documents = docs.len(), "Loaded store snapshot");
        } else if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!(path = %path.display(), "No snapshot found, starting empty");
        }

        Ok(Self {
            docs: Arc::new(docs),
            snapshot: Some(Arc::new(Snapshot {
                path: path.to_path_buf(),
                commit: Mutex::new(()),
            })),
        })
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Fetch a single document by id.
    pub fn get(&self, id: &RecordId) -> Option<ItemRequest> {
        self.docs.get(id).map(|r| r.value().clone())
    }

    fn all_docs(&self) -> Vec<ItemRequest> {
        self.docs.iter().map(|r| r.value().clone()).collect()
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::new();
            if !self.docs.contains_key(&id) {
                return id;
            }
        }
    }

    async fn commit_insert(self, snapshot: Arc<Snapshot>, doc: ItemRequest) -> StoreResult<()> {
        let _commit = snapshot.commit.lock().await;
        let mut staged = self.all_docs();
        staged.push(doc.clone());
        snapshot.write(&staged).await?;
        self.docs.insert(doc.id, doc);
        Ok(())
    }

    async fn commit_update(
        self,
        snapshot: Arc<Snapshot>,
        id: RecordId,
        change: StatusChange,
    ) -> StoreResult<UpdateResult> {
        let _commit = snapshot.commit.lock().await;
        let Some(mut updated) = self.get(&id) else {
            return Ok(UpdateResult::unmatched());
        };
        let modified = apply(&mut updated, change);

        if modified {
            let staged: Vec<ItemRequest> = self
                .all_docs()
                .into_iter()
                .map(|doc| if doc.id == id { updated.clone() } else { doc })
                .collect();
            snapshot.write(&staged).await?;
            self.docs.insert(id, updated);
        }

        Ok(UpdateResult::matched(modified))
    }
}

// lastEditedDate never moves backwards, even if the clock stepped back.
fn apply(doc: &mut ItemRequest, change: StatusChange) -> bool {
    let edited = change.last_edited_date.max(doc.last_edited_date);
    let modified = doc.status != change.status || doc.last_edited_date != edited;
    doc.status = change.status;
    doc.last_edited_date = edited;
    modified
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, filter: Filter, options: FindOptions) -> StoreResult<Vec<ItemRequest>> {
        let mut matching: Vec<ItemRequest> = self
            .docs
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.created_date.cmp(&a.created_date).then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(options.limit).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn insert_one(&self, doc: NewItemRequest) -> StoreResult<InsertOneResult> {
        let id = self.fresh_id();
        let doc = doc.with_id(id);

        match self.snapshot.clone() {
            Some(snapshot) => {
                tokio::spawn(self.clone().commit_insert(snapshot, doc)).await??;
            }
            None => {
                self.docs.insert(id, doc);
            }
        }

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(&self, id: RecordId, change: StatusChange) -> StoreResult<UpdateResult> {
        match self.snapshot.clone() {
            Some(snapshot) => {
                let commit = self.clone().commit_update(snapshot, id, change);
                Ok(tokio::spawn(commit).await??)
            }
            None => Ok(match self.docs.get_mut(&id) {
                Some(mut doc) => UpdateResult::matched(apply(doc.value_mut(), change)),
                None => UpdateResult::unmatched(),
            }),
        }
    }

    async fn flush(&self) -> StoreResult<()> {
        if let Some(snapshot) = &self.snapshot {
            let _commit = snapshot.commit.lock().await;
            let docs = self.all_docs();
            snapshot.write(&docs).await?;
            tracing::info!(path = %snapshot.path.display(), documents = docs.len(), "Flushed store snapshot");
        }
        Ok(())
    }
}
