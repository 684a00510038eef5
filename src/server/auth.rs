//! Shared-secret authentication for the upload endpoint.
//!
//! Every upload must carry the configured secret verbatim in the `X-API-Key`
//! header. The comparison is constant-time.
//!
//! # Example
//!
//! ```rust
//! use axum::http::HeaderMap;
//! use upload_drop::server::auth::{ApiKeyAuth, API_KEY_HEADER};
//!
//! let auth = ApiKeyAuth::new("secret123");
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(API_KEY_HEADER, "secret123".parse().unwrap());
//! assert!(auth.verify_headers(&headers).is_ok());
//! ```

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::error::UploadError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret authenticator.
#[derive(Clone)]
pub struct ApiKeyAuth {
    /// Expected header value
    secret_key: Vec<u8>,
}

impl ApiKeyAuth {
    /// Create a new authenticator with the given secret key.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Check a presented key against the secret.
    ///
    /// An empty secret never matches.
    pub fn verify(&self, presented: &[u8]) -> Result<(), UploadError> {
        if self.secret_key.is_empty() {
            return Err(UploadError::Unauthorized);
        }

        if presented.ct_eq(&self.secret_key).into() {
            Ok(())
        } else {
            Err(UploadError::Unauthorized)
        }
    }

    /// Check the `X-API-Key` header of a request.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<(), UploadError> {
        let presented = headers
            .get(API_KEY_HEADER)
            .ok_or(UploadError::Unauthorized)?;
        self.verify(presented.as_bytes())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
