//! Request Service subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler (query / JSON body)
//!     → service.rs (validate, default, stamp timestamps)
//!     → StoreHandle (find / insert_one / update_one)
//!     → types.rs records and store results
//!     → back to the handler, or ServiceError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Validation happens before any store call; nothing is partially applied
//! - Two failure kinds only: invalid input and unknown
//! - Status updates only accept the four lifecycle values

pub mod error;
pub mod service;
pub mod types;

pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use service::{CreateRequest, ListQuery, RequestService, ServiceSettings, StatusUpdate};
pub use types::{InsertOneResult, ItemRequest, RecordId, Status, UpdateResult};
