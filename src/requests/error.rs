//! Request service error taxonomy.

use thiserror::Error;

use crate::requests::types::{InvalidRecordId, UnknownStatus};
use crate::store::StoreError;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Coarse classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Unknown,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// Failure of a request service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, empty or malformed input. Nothing was written.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Store failure, timeout or anything else unexpected.
    #[error("unknown error: {0}")]
    Unknown(#[from] StoreError),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
            ServiceError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl From<InvalidRecordId> for ServiceError {
    fn from(e: InvalidRecordId) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

impl From<UnknownStatus> for ServiceError {
    fn from(e: UnknownStatus) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}
