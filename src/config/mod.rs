//! Configuration module for the SlideCloud facade

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main facade settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub platform: PlatformSettings,
    pub storage: StorageSettings,
}

/// Platform API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSettings {
    /// Path to the locally stored service credential file
    pub credentials_path: PathBuf,
    /// Base URL of the platform REST API
    pub api_base_url: String,
}

/// Object storage configuration for the asset bucket
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub bucket_name: String,
    /// Custom endpoint for S3-compatible backends; AWS default when absent
    pub endpoint_url: Option<String>,
    pub region: String,
    /// Prefix for public object URLs; falls back to `{endpoint}/{bucket}`
    pub public_url_prefix: Option<String>,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with SLIDECLOUD_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local overrides (gitignored)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables (SLIDECLOUD_STORAGE__BUCKET_NAME, etc.)
            .add_source(
                Environment::with_prefix("SLIDECLOUD")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            platform: PlatformSettings {
                credentials_path: PathBuf::from("service-key.json"),
                api_base_url: "https://api.slidecloud.dev".to_string(),
            },
            storage: StorageSettings {
                bucket_name: "slidecloud-assets".to_string(),
                endpoint_url: None,
                region: "auto".to_string(),
                public_url_prefix: None,
            },
        }
    }
}
