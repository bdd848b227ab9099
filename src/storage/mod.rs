//! Asset storage for slide images
//!
//! Assets are binary objects addressed by hierarchical path strings
//! (`users/{uid}/images/{filename}`), uploaded public-read and served from
//! a stable public URL. The [`ObjectStore`] trait is the seam to the
//! object-storage protocol; [`s3::S3ObjectStore`] talks to the platform
//! bucket and [`memory::MemoryObjectStore`] backs tests.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Errors that can occur during asset storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the canonical object key for a user's slide image
pub fn user_image_key(uid: &str, filename: &str) -> String {
    format!("users/{}/images/{}", uid, filename)
}

/// Object-storage protocol: upload, delete, public retrieval URL
///
/// Uploading to an existing path silently overwrites. Deleting a missing
/// object yields [`StorageError::NotFound`] where the backend can tell;
/// backends that cannot distinguish treat it as success.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write bytes to `path`, mark the object public-read, and return its
    /// stable public URL
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Fetch the object at `path`
    async fn download(&self, path: &str) -> Result<Bytes, StorageError>;

    /// Remove the object at `path`
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Public URL for the object at `path`
    fn public_url(&self, path: &str) -> String;

    /// Upload a file from disk; identical semantics to [`ObjectStore::upload`]
    async fn upload_file(
        &self,
        path: &str,
        file_path: &std::path::Path,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let data = tokio::fs::read(file_path).await?;
        self.upload(path, Bytes::from(data), content_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_image_key() {
        assert_eq!(
            user_image_key("user-1", "slide_1.jpg"),
            "users/user-1/images/slide_1.jpg"
        );
    }
}
