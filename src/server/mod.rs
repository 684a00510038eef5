//! HTTP server layer for Upload Drop.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                        POST /upload                             │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │  (API key)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{ApiKeyAuth, API_KEY_HEADER};
pub use handlers::{
    health_handler, upload_handler, AppState, HealthResponse, UploadResponse, FILE_FIELD,
};
pub use routes::{create_router, RouterConfig};
