//! Item request record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle tag of an item request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Approved,
        Status::Completed,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Completed => "completed",
            Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four status names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}', expected one of pending, approved, completed, rejected")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Store-assigned record identifier.
///
/// Twelve bytes, rendered as 24 lowercase hex characters:
/// - 4 bytes: seconds since the Unix epoch (big-endian)
/// - 5 bytes: random, fixed for the lifetime of the process
/// - 3 bytes: counter seeded randomly, incremented per id (big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; 12]);

/// Returned when a string is not a well-formed [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{0}', expected 24 hex characters")]
pub struct InvalidRecordId(pub String);

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut bytes = [0u8; 5];
        bytes.iter_mut().for_each(|b| *b = fastrand::u8(..));
        bytes
    })
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(fastrand::u32(..0x00ff_ffff)))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

impl RecordId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        let counter = next_counter();

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRecordId(s.to_string());
        if s.len() != 24 || !s.is_ascii() {
            return Err(invalid());
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A tracked item request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: RecordId,
    pub requestor_name: String,
    pub item_requested: String,
    pub status: Status,
    pub created_date: DateTime<Utc>,
    pub last_edited_date: DateTime<Utc>,
}

/// A request document before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub requestor_name: String,
    pub item_requested: String,
    pub status: Status,
    pub created_date: DateTime<Utc>,
    pub last_edited_date: DateTime<Utc>,
}

impl NewItemRequest {
    /// A pending request stamped with a single creation time.
    pub fn pending(requestor_name: String, item_requested: String, now: DateTime<Utc>) -> Self {
        Self {
            requestor_name,
            item_requested,
            status: Status::Pending,
            created_date: now,
            last_edited_date: now,
        }
    }

    pub fn with_id(self, id: RecordId) -> ItemRequest {
        ItemRequest {
            id,
            requestor_name: self.requestor_name,
            item_requested: self.item_requested,
            status: self.status,
            created_date: self.created_date,
            last_edited_date: self.last_edited_date,
        }
    }
}

/// Fields overwritten together by a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: Status,
    pub last_edited_date: DateTime<Utc>,
}

/// Outcome of an insert, in the shape document stores report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: RecordId,
}

/// Outcome of a conditional, non-upserting update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<RecordId>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<Status>().unwrap(), Status::Pending);
        assert_eq!("approved".parse::<Status>().unwrap(), Status::Approved);
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert_eq!("rejected".parse::<Status>().unwrap(), Status::Rejected);

        assert!("".parse::<Status>().is_err());
        assert!("Pending".parse::<Status>().is_err());
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_record_id_hex_format() {
        let id = RecordId::new();
        let hex = id.to_hex();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex.parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_id_accepts_uppercase() {
        let id: RecordId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_record_id_rejects_malformed() {
        assert!("".parse::<RecordId>().is_err());
        assert!("not-an-id".parse::<RecordId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4".parse::<RecordId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4bc".parse::<RecordId>().is_err());
        assert!("zza1b2c3d4e5f60718293a4b".parse::<RecordId>().is_err());
        // 24 bytes, 12 chars
        assert!("éééééééééééé".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_item_request_field_names() {
        let now = Utc::now();
        let record = NewItemRequest::pending("Jane Doe".into(), "Flashlights".into(), now)
            .with_id(RecordId::new());
        let value = serde_json::to_value(&record).unwrap();

        let obj = value.as_object().unwrap();
        for key in ["id", "requestorName", "itemRequested", "status", "createdDate", "lastEditedDate"] {
            assert!(obj.contains_key(key), "missing field {}", key);
        }
        assert_eq!(obj.len(), 6);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["createdDate"], value["lastEditedDate"]);
    }

    #[test]
    fn test_update_result_shape() {
        let value = serde_json::to_value(UpdateResult::unmatched()).unwrap();
        assert_eq!(value["matchedCount"], 0);
        assert_eq!(value["modifiedCount"], 0);
        assert_eq!(value["upsertedCount"], 0);
        assert!(value["upsertedId"].is_null());
    }
}
