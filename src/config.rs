//! Configuration management for Upload Drop.
//!
//! Configuration is read once at startup from command-line arguments, with
//! every option also settable through the environment:
//!
//! - `UPLOAD_PATH` - Directory where uploaded files are stored (default: current directory)
//! - `PUBLIC_URL` - Prefix prepended to stored file names in responses (default: empty)
//! - `API_KEY` - Shared secret required in the `X-API-Key` header (required)
//! - `PORT` - TCP port to listen on (required)
//! - `HOST` - Address to bind to (default: 0.0.0.0)
//! - `MAX_UPLOAD_BYTES` - Optional cap on the request body size
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use upload_drop::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! println!("Listening on {}", config.bind_address());
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::error::StartupError;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default upload directory (the working directory of the process).
pub const DEFAULT_UPLOAD_PATH: &str = ".";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Upload Drop - An authenticated file upload endpoint.
///
/// Accepts multipart uploads on `POST /upload`, stores each file under a
/// random name in a local directory and answers with its public URL.
#[derive(Parser, Debug, Clone)]
#[command(name = "upload-drop")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Directory where uploaded files are written.
    #[arg(long, default_value = DEFAULT_UPLOAD_PATH, env = "UPLOAD_PATH")]
    pub upload_path: PathBuf,

    /// Prefix prepended to the stored file name to build the returned URL.
    ///
    /// Usually ends with a slash, e.g. `https://cdn.example.com/`.
    #[arg(long, default_value = "", env = "PUBLIC_URL")]
    pub public_url: String,

    /// Maximum accepted request body size in bytes.
    ///
    /// If not specified, uploads of any size are accepted.
    #[arg(long, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared secret expected in the `X-API-Key` header.
    ///
    /// The server refuses to start without it.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.api_key_or_empty().is_empty() {
            return Err(StartupError::MissingCredential);
        }

        if self.max_upload_bytes == Some(0) {
            return Err(StartupError::InvalidConfig {
                reason: "max_upload_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the API key, or an empty string when unset (call validate() first).
    pub fn api_key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Tests
// =============================================================================
