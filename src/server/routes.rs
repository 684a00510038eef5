//! Router configuration for Upload Drop.
//!
//! # Route Structure
//!
//! ```text
//! /upload    - File upload (any method is routed here; non-POST gets 405)
//! /health    - Health check (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use upload_drop::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new("my-secret-key")
//!     .with_upload_path("/srv/uploads")
//!     .with_public_url("https://cdn.example.com/");
//!
//! let router = create_router(config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::auth::ApiKeyAuth;
use super::handlers::{health_handler, upload_handler, AppState};
use crate::config::Config;
use crate::storage::FileStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Shared secret required in the `X-API-Key` header
    pub api_key: String,

    /// Directory uploads are written to
    pub upload_path: PathBuf,

    /// Prefix prepended to stored file names in responses
    pub public_url: String,

    /// Maximum request body size (None = unlimited)
    pub max_upload_bytes: Option<usize>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given API key.
    ///
    /// By default:
    /// - Files are stored in the working directory
    /// - Returned URLs are relative (empty prefix)
    /// - Upload size is unlimited
    /// - Tracing is enabled
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            upload_path: PathBuf::new(),
            public_url: String::new(),
            max_upload_bytes: None,
            enable_tracing: true,
        }
    }

    /// Build a router configuration from the application config.
    pub fn from_config(config: &Config) -> Self {
        let mut router_config = Self::new(config.api_key_or_empty())
            .with_upload_path(config.upload_path.clone())
            .with_public_url(config.public_url.clone())
            .with_tracing(!config.no_tracing);

        if let Some(limit) = config.max_upload_bytes {
            router_config = router_config.with_max_upload_bytes(limit);
        }

        router_config
    }

    /// Set the directory uploads are written to.
    pub fn with_upload_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.upload_path = path.into();
        self
    }

    /// Set the public URL prefix.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into();
        self
    }

    /// Cap the request body size in bytes.
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = Some(limit);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
pub fn create_router(config: RouterConfig) -> Router {
    let app_state = AppState::new(
        ApiKeyAuth::new(&config.api_key),
        FileStore::new(config.upload_path.clone()),
        config.public_url.as_str(),
    );

    // Axum caps bodies at 2MB by default; uploads are uncapped unless configured
    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let router = Router::new()
        .route("/upload", any(upload_handler).layer(body_limit))
        .route("/health", get(health_handler))
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
