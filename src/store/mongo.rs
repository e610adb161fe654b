//! MongoDB-backed document store.
//!
//! Documents live in the `requests` collection of the database named in the
//! connection string, or `crisis-corner` when none is given. Ids are BSON
//! ObjectIds generated client-side; dates are BSON datetimes (millisecond
//! precision).
//!
//! Connection pooling and reconnection are the driver's. Server selection
//! and connect attempts are bounded by the configured store timeout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::requests::types::{
    InsertOneResult, ItemRequest, NewItemRequest, RecordId, Status, StatusChange, UpdateResult,
};
use crate::store::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Filter, FindOptions};

pub const DEFAULT_DATABASE: &str = "crisis-corner";
pub const COLLECTION: &str = "requests";

/// Stored shape of an item request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    requestor_name: String,
    item_requested: String,
    status: Status,
    created_date: BsonDateTime,
    last_edited_date: BsonDateTime,
}

impl From<&ItemRequest> for RequestDocument {
    fn from(doc: &ItemRequest) -> Self {
        Self {
            id: ObjectId::from_bytes(doc.id.bytes()),
            requestor_name: doc.requestor_name.clone(),
            item_requested: doc.item_requested.clone(),
            status: doc.status,
            created_date: to_bson_date(doc.created_date),
            last_edited_date: to_bson_date(doc.last_edited_date),
        }
    }
}

impl TryFrom<RequestDocument> for ItemRequest {
    type Error = StoreError;

    fn try_from(doc: RequestDocument) -> StoreResult<Self> {
        let id = doc.id;
        let date = |value: BsonDateTime| {
            DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).ok_or_else(|| {
                StoreError::InvalidDocument(format!("document {} has an out-of-range date", id))
            })
        };

        Ok(ItemRequest {
            id: RecordId::from_bytes(id.bytes()),
            created_date: date(doc.created_date)?,
            last_edited_date: date(doc.last_edited_date)?,
            requestor_name: doc.requestor_name,
            item_requested: doc.item_requested,
            status: doc.status,
        })
    }
}

fn to_bson_date(date: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(date.timestamp_millis())
}

fn filter_document(filter: Filter) -> Document {
    match filter {
        Filter::All => doc! {},
        Filter::Status(status) => doc! { "status": status.as_str() },
    }
}

fn newest_first() -> Document {
    doc! { "createdDate": -1, "_id": -1 }
}

// `$max` keeps lastEditedDate from moving backwards.
fn status_update(change: StatusChange) -> Document {
    doc! {
        "$set": { "status": change.status.as_str() },
        "$max": { "lastEditedDate": to_bson_date(change.last_edited_date) },
    }
}

/// Handle on the `requests` collection.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<RequestDocument>,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(uri: &str, timeout: Duration) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(database = %database.name(), collection = COLLECTION, "MongoDB reachable");
        Ok(Self {
            collection: database.collection(COLLECTION),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, filter: Filter, options: FindOptions) -> StoreResult<Vec<ItemRequest>> {
        // A zero limit means "unlimited" to the server.
        if options.limit == 0 {
            return Ok(Vec::new());
        }

        let mut cursor = self
            .collection
            .find(filter_document(filter))
            .sort(newest_first())
            .skip(options.skip)
            .limit(i64::try_from(options.limit).unwrap_or(i64::MAX))
            .await?;

        let mut docs = Vec::new();
        while cursor.advance().await? {
            docs.push(ItemRequest::try_from(cursor.deserialize_current()?)?);
        }
        Ok(docs)
    }

    async fn insert_one(&self, doc: NewItemRequest) -> StoreResult<InsertOneResult> {
        let doc = doc.with_id(RecordId::new());
        self.collection.insert_one(RequestDocument::from(&doc)).await?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: doc.id,
        })
    }

    async fn update_one(&self, id: RecordId, change: StatusChange) -> StoreResult<UpdateResult> {
        let result = self
            .collection
            .update_one(doc! { "_id": ObjectId::from_bytes(id.bytes()) }, status_update(change))
            .upsert(false)
            .await?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: 0,
            upserted_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ItemRequest {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        NewItemRequest::pending("Jane Doe".to_string(), "Flashlights".to_string(), created)
            .with_id("65a1b2c3d4e5f60718293a4b".parse().unwrap())
    }

    #[test]
    fn test_document_uses_object_id_and_camel_case() {
        let stored = RequestDocument::from(&sample());
        let bson = mongodb::bson::to_document(&stored).unwrap();

        assert_eq!(
            bson.get_object_id("_id").unwrap().to_hex(),
            "65a1b2c3d4e5f60718293a4b"
        );
        assert_eq!(bson.get_str("requestorName").unwrap(), "Jane Doe");
        assert_eq!(bson.get_str("itemRequested").unwrap(), "Flashlights");
        assert_eq!(bson.get_str("status").unwrap(), "pending");
        assert!(bson.get_datetime("createdDate").is_ok());
        assert!(bson.get_datetime("lastEditedDate").is_ok());
    }

    #[test]
    fn test_document_converts_back() {
        let original = sample();
        let stored = RequestDocument::from(&original);
        let bson = mongodb::bson::to_document(&stored).unwrap();
        let loaded: RequestDocument = mongodb::bson::from_document(bson).unwrap();

        assert_eq!(ItemRequest::try_from(loaded).unwrap(), original);
    }

    #[test]
    fn test_out_of_range_date_is_rejected() {
        let mut stored = RequestDocument::from(&sample());
        stored.created_date = BsonDateTime::MAX;

        assert!(matches!(
            ItemRequest::try_from(stored),
            Err(StoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_filter_documents() {
        assert_eq!(filter_document(Filter::All), doc! {});
        assert_eq!(
            filter_document(Filter::Status(Status::Approved)),
            doc! { "status": "approved" }
        );
    }

    #[test]
    fn test_status_update_sets_status_and_never_rewinds_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap();
        let update = status_update(StatusChange {
            status: Status::Completed,
            last_edited_date: at,
        });

        assert_eq!(
            update.get_document("$set").unwrap(),
            &doc! { "status": "completed" }
        );
        let max = update.get_document("$max").unwrap();
        assert_eq!(
            max.get_datetime("lastEditedDate").unwrap().timestamp_millis(),
            at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_connection_string() {
        let result = MongoStore::connect("mongodb://", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(StoreError::Mongo(_))));
    }
}
