//! S3-compatible client for the platform asset bucket
//!
//! ## Folder structure
//! ```text
//! slidecloud-assets/
//! └── users/
//!     └── {uid}/
//!         └── images/
//!             └── {filename}      # slide images, public-read
//! ```

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Builder, Credentials, Region},
    error::SdkError,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client as S3Client,
};
use bytes::Bytes;
use std::fmt;
use tracing::{debug, info, instrument};

use super::{ObjectStore, StorageError};
use crate::config::StorageSettings;
use crate::platform::ServiceCredentials;

/// Asset bucket client backed by an S3-compatible endpoint
#[derive(Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    public_url_prefix: String,
}

impl S3ObjectStore {
    /// Create a new bucket client from settings and service credentials
    pub fn new(settings: &StorageSettings, credentials: &ServiceCredentials) -> Self {
        let creds = Credentials::new(
            &credentials.storage_access_key_id,
            &credentials.storage_secret_access_key,
            None, // session token
            None, // expiry
            "slidecloud-static-credentials",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(creds)
            .force_path_style(true);

        if let Some(ref endpoint) = settings.endpoint_url {
            debug!("Creating bucket client with endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        let client = S3Client::from_conf(builder.build());

        let public_url_prefix = settings
            .public_url_prefix
            .clone()
            .unwrap_or_else(|| match settings.endpoint_url {
                Some(ref endpoint) => {
                    format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket_name)
                }
                None => format!("https://{}.s3.amazonaws.com", settings.bucket_name),
            });

        S3ObjectStore {
            client,
            bucket: settings.bucket_name.clone(),
            public_url_prefix,
        }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = data.len();
        debug!("Uploading {} bytes to bucket: {}", size, path);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{:?}", e)))?;

        info!("Uploaded asset: {} ({} bytes)", path, size);
        Ok(self.public_url(path))
    }

    #[instrument(skip(self))]
    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if is_not_found_error(&e) {
                    StorageError::NotFound(path.to_string())
                } else {
                    StorageError::DownloadFailed(format!("{:?}", e))
                }
            })?;

        let data = result
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(format!("Failed to read body: {:?}", e)))?
            .into_bytes();

        debug!("Downloaded {} bytes from bucket: {}", data.len(), path);
        Ok(data)
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        debug!("Deleting from bucket: {}", path);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("{:?}", e)))?;

        info!("Deleted asset: {}", path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_url_prefix.trim_end_matches('/'), path)
    }
}

/// Helper to check if an SDK error is a "not found" error
fn is_not_found_error<E: fmt::Debug>(err: &SdkError<E>) -> bool {
    let debug_str = format!("{:?}", err);
    debug_str.contains("NoSuchKey") || debug_str.contains("NotFound") || debug_str.contains("404")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageSettings;

    fn credentials() -> ServiceCredentials {
        ServiceCredentials {
            project_id: "slidecloud-test".to_string(),
            api_token: "tok".to_string(),
            storage_access_key_id: "AKIA".to_string(),
            storage_secret_access_key: "secret".to_string(),
        }
    }

    #[test]
    fn test_public_url_from_prefix() {
        let settings = StorageSettings {
            bucket_name: "slidecloud-assets".to_string(),
            endpoint_url: Some("https://storage.slidecloud.dev".to_string()),
            region: "auto".to_string(),
            public_url_prefix: Some("https://cdn.slidecloud.dev/".to_string()),
        };

        let store = S3ObjectStore::new(&settings, &credentials());
        assert_eq!(
            store.public_url("users/u1/images/a.png"),
            "https://cdn.slidecloud.dev/users/u1/images/a.png"
        );
    }

    #[test]
    fn test_public_url_falls_back_to_endpoint() {
        let settings = StorageSettings {
            bucket_name: "slidecloud-assets".to_string(),
            endpoint_url: Some("https://storage.slidecloud.dev".to_string()),
            region: "auto".to_string(),
            public_url_prefix: None,
        };

        let store = S3ObjectStore::new(&settings, &credentials());
        assert_eq!(
            store.public_url("users/u1/images/a.png"),
            "https://storage.slidecloud.dev/slidecloud-assets/users/u1/images/a.png"
        );
    }
}
