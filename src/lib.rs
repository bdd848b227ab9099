//! SlideCloud client facade
//!
//! Typed facade over the SlideCloud platform: bearer-credential identity
//! verification, public image-asset storage, and owner-gated CRUD over
//! presentation documents. Every operation delegates to a platform
//! protocol; this crate contributes field mapping, defaulting,
//! authorization checks, and error classification.
//!
//! A [`Backend`] is constructed once per process from [`Settings`] and
//! shared by the embedding application:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use slidecloud::{Backend, Settings};
//!
//! let settings = Settings::load()?;
//! let backend = Backend::connect(&settings)?;
//!
//! let identity = backend.identity.verify_token("eyJhbGciOi...").await?;
//! let decks = backend.presentations.list_by_owner(&identity.uid, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod platform;
pub mod storage;
pub mod store;

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::platform::{ApiClient, CredentialError, ServiceCredentials};
use crate::storage::S3ObjectStore;
use crate::store::HttpDocumentStore;

pub use auth::{AuthError, Identity, IdentityClient};
pub use config::Settings;
pub use storage::{ObjectStore, StorageError};
pub use store::{
    Presentation, PresentationDraft, PresentationStore, PresentationSummary, StoreError,
};

/// Fatal construction errors; there is no degraded mode
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialError),
}

/// The platform facade: identity, asset storage, and presentation documents
///
/// All three capability groups share the platform handles built here.
/// Construct once at process startup and pass by reference (the component
/// clients are cheap to clone).
pub struct Backend {
    pub identity: IdentityClient,
    pub assets: Arc<dyn ObjectStore>,
    pub presentations: PresentationStore,
}

impl Backend {
    /// Build the facade from settings
    ///
    /// Loads the service credential file and constructs the shared API and
    /// bucket clients. Fails hard when the credential file is absent or
    /// malformed.
    pub fn connect(settings: &Settings) -> Result<Self, InitError> {
        let credentials = ServiceCredentials::from_file(&settings.platform.credentials_path)?;

        let api = Arc::new(ApiClient::new(
            &settings.platform.api_base_url,
            &credentials.api_token,
        ));
        let assets: Arc<dyn ObjectStore> =
            Arc::new(S3ObjectStore::new(&settings.storage, &credentials));
        let documents = Arc::new(HttpDocumentStore::new(api.clone()));

        info!(
            project_id = %credentials.project_id,
            bucket = %settings.storage.bucket_name,
            "Connected to platform"
        );

        Ok(Backend {
            identity: IdentityClient::new(api),
            assets: assets.clone(),
            presentations: PresentationStore::new(documents, assets),
        })
    }
}
