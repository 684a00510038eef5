use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while handling a single upload request.
///
/// None of these outlive the request: each one is logged and turned into an
/// HTTP response by the handler layer.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Request used a method other than POST (HTTP 405)
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// `X-API-Key` header is missing or does not match (HTTP 401)
    #[error("Missing or invalid API key")]
    Unauthorized,

    /// Multipart body is unreadable or has no usable `file` field (HTTP 400)
    #[error("Invalid upload: {reason}")]
    BadRequest { reason: String },

    /// Uploaded file name has an empty or overlong extension (HTTP 415)
    #[error("Invalid file extension '{extension}'")]
    UnsupportedMediaType { extension: String },

    /// Request body exceeded the configured upload cap (HTTP 413)
    #[error("Upload exceeds the configured size limit")]
    PayloadTooLarge,

    /// Destination file could not be created
    #[error("Failed to create {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the upload stream or writing the destination failed mid-copy
    #[error("Failed to write {}: {reason}", .path.display())]
    WriteFile { path: PathBuf, reason: String },
}

/// Fatal errors raised while starting the server.
#[derive(Debug, Error)]
pub enum StartupError {
    /// No shared secret configured
    #[error("API_KEY environment variable is required")]
    MissingCredential,

    /// A configuration value is out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The listener could not be bound
    #[error("Failed to bind to {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an error
    #[error("Server failed: {0}")]
    Serve(#[source] std::io::Error),
}
