//! HTTP request handlers for the upload API.
//!
//! # Endpoints
//!
//! - `POST /upload` - Store a multipart file upload
//! - `GET /health` - Health check endpoint

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{multipart::Field, ConnectInfo, FromRequest, Multipart, Request, State},
    response::{IntoResponse, Response},
    Json,
};
use http::{header, HeaderValue, Method, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::UploadError;
use crate::storage::{validate_extension, FileStore};

use super::auth::ApiKeyAuth;

/// Name of the multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Built once at startup and cloned into every handler invocation; nothing in
/// it is mutated while serving.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Shared-secret check for incoming uploads
    pub auth: ApiKeyAuth,

    /// Directory uploads are written to
    pub store: FileStore,

    /// Prefix for returned URLs
    pub public_url: Arc<str>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(auth: ApiKeyAuth, store: FileStore, public_url: impl Into<Arc<str>>) -> Self {
        Self {
            auth,
            store,
            public_url: public_url.into(),
        }
    }

    /// Build the public URL for a stored file name.
    pub fn public_url_for(&self, stored_name: &str) -> String {
        format!("{}{}", self.public_url, stored_name)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Body returned for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL of the stored file
    pub url: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl UploadError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            UploadError::Unauthorized => StatusCode::UNAUTHORIZED,
            UploadError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            UploadError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::CreateFile { .. } | UploadError::WriteFile { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text message sent to the client.
    ///
    /// Internal details (paths, OS errors) stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            UploadError::MethodNotAllowed { .. } => "Only POST allowed",
            UploadError::Unauthorized => "Authorised access only",
            UploadError::BadRequest { .. } => "Failed to read file",
            UploadError::UnsupportedMediaType { .. } => "File must have a valid extension",
            UploadError::PayloadTooLarge => "File exceeds the maximum upload size",
            UploadError::CreateFile { .. } => "Failed to save file",
            UploadError::WriteFile { .. } => "Failed to write file",
        }
    }
}

/// Convert UploadError to a plain-text HTTP response.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), self.public_message()).into_response();

        if matches!(self, UploadError::MethodNotAllowed { .. }) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}

/// Log a failed upload with the client address.
///
/// Client errors are logged at WARN, storage failures at ERROR.
fn log_failure(err: &UploadError, remote_addr: &str) {
    let status = err.status_code();
    if status.is_server_error() {
        error!(
            remote_addr = %remote_addr,
            status = status.as_u16(),
            "Upload failed: {}",
            err
        );
    } else {
        warn!(
            remote_addr = %remote_addr,
            status = status.as_u16(),
            "Rejected: {}",
            err
        );
    }
}

/// Map a multipart decoding error to an upload error.
fn multipart_error(err: axum::extract::multipart::MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge
    } else {
        UploadError::BadRequest {
            reason: err.body_text(),
        }
    }
}

/// Address of the connected client, or "unknown" when the server was not
/// started with connect info (e.g. in-process tests).
fn remote_addr(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle upload requests.
///
/// # Endpoint
///
/// `POST /upload`
///
/// # Headers
///
/// - `X-API-Key`: the shared secret (required)
///
/// # Body
///
/// `multipart/form-data` with a `file` field carrying a file name and content.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "url": "https://cdn.example.com/0b5c6a9e-5f0e-4a4e-9c1d-3f1f6c1e2d7a.png"
/// }
/// ```
///
/// # Errors
///
/// Checks run in this order and the first failure wins:
///
/// - `405 Method Not Allowed`: method is not POST
/// - `401 Unauthorized`: missing or wrong `X-API-Key`
/// - `400 Bad Request`: body is not multipart or has no `file` field with a file name
/// - `415 Unsupported Media Type`: file name extension is empty or longer than 10 bytes
/// - `413 Payload Too Large`: body exceeds the configured cap
/// - `500 Internal Server Error`: the file could not be created or written
pub async fn upload_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, UploadError> {
    let remote_addr = remote_addr(&request);
    info!(
        method = %request.method(),
        remote_addr = %remote_addr,
        "Incoming upload request"
    );

    let result = process_upload(&state, request, &remote_addr).await;
    if let Err(ref err) = result {
        log_failure(err, &remote_addr);
    }
    result.map(Json)
}

async fn process_upload(
    state: &AppState,
    request: Request,
    remote_addr: &str,
) -> Result<UploadResponse, UploadError> {
    if request.method() != Method::POST {
        return Err(UploadError::MethodNotAllowed {
            method: request.method().to_string(),
        });
    }

    state.auth.verify_headers(request.headers())?;

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| UploadError::BadRequest {
            reason: rejection.body_text(),
        })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }
        // A `file` part without a file name is a plain form value
        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => {
                debug!("Skipping `{}` field without a file name", FILE_FIELD);
                continue;
            }
        };
        return store_field(state, field, &original_name, remote_addr).await;
    }

    Err(UploadError::BadRequest {
        reason: format!("no `{}` file in form", FILE_FIELD),
    })
}

/// Validate the file field, stream it to disk and build the response.
async fn store_field(
    state: &AppState,
    mut field: Field<'_>,
    original_name: &str,
    remote_addr: &str,
) -> Result<UploadResponse, UploadError> {
    let extension = validate_extension(original_name)?;
    let mut file = state.store.create(extension).await?;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => file.write_chunk(&chunk).await?,
            Ok(None) => break,
            Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                file.discard().await;
                return Err(UploadError::PayloadTooLarge);
            }
            Err(err) => return Err(file.write_error(err.body_text())),
        }
    }

    let stored_name = file.name().to_string();
    let bytes = file.finish().await?;

    info!(
        remote_addr = %remote_addr,
        stored_name = %stored_name,
        original_name = %original_name,
        bytes = bytes,
        "Successfully uploaded file"
    );

    Ok(UploadResponse {
        url: state.public_url_for(&stored_name),
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
