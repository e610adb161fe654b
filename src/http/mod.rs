//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (extract query / JSON body)
//!     → Request Service
//!     → response.rs (error mapping) or JSON success body
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{build_router, AppState, HttpServer, REQUEST_PATH};
