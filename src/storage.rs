//! Local file storage for uploads.
//!
//! Every upload is written to a flat directory under a generated name of the
//! form `<uuid><extension>`, where the extension is copied verbatim from the
//! client-supplied file name. Files are never modified or removed afterwards.
//!
//! # Example
//!
//! ```rust,no_run
//! use upload_drop::storage::{validate_extension, FileStore};
//!
//! # async fn example() -> Result<(), upload_drop::UploadError> {
//! let store = FileStore::new("/srv/uploads");
//! let extension = validate_extension("photo.png")?;
//!
//! let mut file = store.create(extension).await?;
//! file.write_chunk(b"\xFF\xD8").await?;
//! let written = file.finish().await?;
//! assert_eq!(written, 2);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use crate::error::UploadError;

/// Longest accepted extension in bytes, leading dot included.
pub const MAX_EXTENSION_LEN: usize = 10;

// =============================================================================
// Naming
// =============================================================================

/// Return the extension of the final path component of `filename`.
///
/// Trailing slashes are ignored, so `a.png/` has the extension `.png`.
/// The extension runs from the last `.` to the end of the name, dot included.
/// Returns an empty string when the final component has no dot.
pub fn file_extension(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Extract the extension of `filename` and check it is storable.
pub fn validate_extension(filename: &str) -> Result<&str, UploadError> {
    let extension = file_extension(filename);
    if extension.is_empty() || extension.len() > MAX_EXTENSION_LEN {
        return Err(UploadError::UnsupportedMediaType {
            extension: extension.to_string(),
        });
    }
    Ok(extension)
}

/// Generate a fresh stored file name: a random v4 UUID followed by `extension`.
pub fn stored_name(extension: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension)
}

// =============================================================================
// File Store
// =============================================================================

/// Directory that uploaded files are written into.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. An empty path means the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new, empty file named `<uuid><extension>` in the store.
    pub async fn create(&self, extension: &str) -> Result<StoredFile, UploadError> {
        let name = stored_name(extension);
        let path = self.root.join(&name);

        let file = File::create(&path)
            .await
            .map_err(|source| UploadError::CreateFile {
                path: path.clone(),
                source,
            })?;

        Ok(StoredFile {
            file,
            name,
            path,
            bytes_written: 0,
        })
    }
}

/// A file being written into the store.
///
/// Dropping it before [`StoredFile::finish`] leaves whatever was written so
/// far on disk. Use [`StoredFile::discard`] to remove it instead.
#[derive(Debug)]
pub struct StoredFile {
    file: File,
    name: String,
    path: PathBuf,
    bytes_written: u64,
}

impl StoredFile {
    /// Generated file name, relative to the store root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a chunk of upload data.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| self.write_error(e))?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush buffered data to disk and return the total number of bytes written.
    pub async fn finish(mut self) -> Result<u64, UploadError> {
        self.file.flush().await.map_err(|e| self.write_error(e))?;
        Ok(self.bytes_written)
    }

    /// Close and delete the file.
    ///
    /// Removal failures are logged, not returned.
    pub async fn discard(self) {
        let StoredFile { file, path, .. } = self;
        drop(file);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove discarded upload");
        }
    }

    /// Build a write error for this file from any displayable cause.
    pub fn write_error(&self, cause: impl std::fmt::Display) -> UploadError {
        UploadError::WriteFile {
            path: self.path.clone(),
            reason: cause.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
