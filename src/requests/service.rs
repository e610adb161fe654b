//! List, create and status-update operations over request records.

use chrono::Utc;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::requests::error::{ServiceError, ServiceResult};
use crate::requests::types::{
    InsertOneResult, ItemRequest, NewItemRequest, RecordId, Status, StatusChange, UpdateResult,
};
use crate::store::{Filter, FindOptions, StoreHandle};

/// Query parameters for `list`. Both are kept raw so that malformed values
/// fall back to defaults instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub status: Option<String>,
}

/// Body of a create call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub requestor_name: Option<String>,
    pub item_requested: Option<String>,
}

/// Body of a status-update call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    pub id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Records per page.
    pub page_size: u64,
    /// Maximum characters in a name field.
    pub max_field_length: usize,
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.pagination.page_size,
            max_field_length: config.security.max_field_length,
        }
    }
}

/// Page number to use for a raw `page` parameter. Absent, unparsable and
/// non-positive values all mean page 1.
pub fn resolve_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| p as u64)
        .unwrap_or(1)
}

/// Filter for a raw `status` parameter. Unrecognized values mean no filter.
pub fn resolve_filter(raw: Option<&str>) -> Filter {
    raw.and_then(|s| s.parse::<Status>().ok())
        .map(Filter::Status)
        .unwrap_or(Filter::All)
}

fn required_text(value: Option<String>, field: &str, max_len: usize) -> ServiceResult<String> {
    let value = value.unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(ServiceError::invalid(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// The request-handling core.
#[derive(Clone)]
pub struct RequestService {
    store: StoreHandle,
    settings: ServiceSettings,
}

impl RequestService {
    pub fn new(store: StoreHandle, settings: ServiceSettings) -> Self {
        Self { store, settings }
    }

    /// One page of requests, newest first, optionally filtered by status.
    pub async fn list(&self, query: ListQuery) -> ServiceResult<Vec<ItemRequest>> {
        let page = resolve_page(query.page.as_deref());
        let filter = resolve_filter(query.status.as_deref());
        let options = FindOptions {
            skip: (page - 1).saturating_mul(self.settings.page_size),
            limit: self.settings.page_size,
        };

        tracing::debug!(page, ?filter, skip = options.skip, "Listing requests");
        Ok(self.store.find(filter, options).await?)
    }

    /// Record a new pending request.
    pub async fn create(&self, body: CreateRequest) -> ServiceResult<InsertOneResult> {
        let max = self.settings.max_field_length;
        let requestor_name = required_text(body.requestor_name, "requestorName", max)?;
        let item_requested = required_text(body.item_requested, "itemRequested", max)?;

        let doc = NewItemRequest::pending(requestor_name, item_requested, Utc::now());
        let result = self.store.insert_one(doc).await?;

        tracing::info!(id = %result.inserted_id, "Request created");
        Ok(result)
    }

    /// Move a request to a new status. An unknown id is not an error; the
    /// result reports zero matches.
    pub async fn update_status(&self, body: StatusUpdate) -> ServiceResult<UpdateResult> {
        let id: RecordId = body.id.unwrap_or_default().parse()?;
        let status: Status = match body.status {
            Some(raw) => raw.parse()?,
            None => return Err(ServiceError::invalid("status is required")),
        };

        let change = StatusChange {
            status,
            last_edited_date: Utc::now(),
        };
        let result = self.store.update_one(id, change).await?;

        if result.matched_count == 0 {
            tracing::info!(id = %id, "Status update matched no request");
        } else {
            tracing::info!(id = %id, status = %status, "Request status updated");
        }
        Ok(result)
    }
}
