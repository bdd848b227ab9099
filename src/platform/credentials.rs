//! Service credential loading
//!
//! The facade authenticates to the platform with a locally stored service
//! credential file (JSON). Construction fails hard when the file is absent
//! or malformed; there is no degraded mode.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading service credentials
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Service credential file not found at {0}")]
    NotFound(String),

    #[error("Failed to read credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed credential file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Service account credentials for the platform
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCredentials {
    /// Platform project identifier
    pub project_id: String,
    /// Bearer token for the platform REST API
    pub api_token: String,
    /// Access key for the S3-compatible asset bucket
    pub storage_access_key_id: String,
    /// Secret key for the S3-compatible asset bucket
    pub storage_secret_access_key: String,
}

impl ServiceCredentials {
    /// Load credentials from a JSON file on disk
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        if !path.exists() {
            return Err(CredentialError::NotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let credentials: ServiceCredentials = serde_json::from_str(&raw)?;

        info!(project_id = %credentials.project_id, "Loaded service credentials");
        Ok(credentials)
    }
}
