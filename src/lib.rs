//! # Upload Drop
//!
//! A minimal authenticated file upload endpoint.
//!
//! Clients POST a multipart form with a `file` field and the shared secret in
//! the `X-API-Key` header. The file is written to a local directory under a
//! random UUID name that keeps the original extension, and the response
//! carries the public URL of the stored file.
//!
//! ## Architecture
//!
//! - [`config`] - CLI and environment configuration
//! - [`error`] - Request and startup error types
//! - [`storage`] - Stored-name generation and streaming file writes
//! - [`server`] - Axum-based HTTP server, auth and routes
//!
//! ## Example
//!
//! ```rust,no_run
//! use upload_drop::{create_router, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(
//!         RouterConfig::new("secret123")
//!             .with_upload_path("/srv/uploads")
//!             .with_public_url("https://cdn.example.com/"),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{StartupError, UploadError};
pub use server::{
    create_router, health_handler, upload_handler, ApiKeyAuth, AppState, HealthResponse,
    RouterConfig, UploadResponse, API_KEY_HEADER, FILE_FIELD,
};
pub use storage::{file_extension, stored_name, validate_extension, FileStore, StoredFile};
