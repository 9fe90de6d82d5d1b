//! Handler configuration
//!
//! Handles parsing of TOML configuration files and environment variable overrides.
//! Inside a serverless runtime there is usually no file and everything comes from the
//! environment; locally a file keeps the catalog endpoint out of the shell history.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".s3-lineage-sync.toml";

/// Environment variable for the catalog base URL
pub const ENV_BASE_URL: &str = "ATLAN_BASE_URL";

/// Environment variable for the catalog API key
pub const ENV_API_KEY: &str = "ATLAN_API_KEY";

/// Environment variable for the catalog request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "ATLAN_TIMEOUT_SECS";

/// Environment variable for the S3 region override
pub const ENV_REGION: &str = "S3_LINEAGE_SYNC_REGION";

/// Environment variable for the S3 endpoint override
pub const ENV_ENDPOINT_URL: &str = "S3_LINEAGE_SYNC_ENDPOINT_URL";

/// Name of the role granted admin rights on new connections
pub const DEFAULT_ADMIN_ROLE: &str = "$admin";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    ReadFailed(String, String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(String),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Catalog (Atlan) connection section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Tenant base URL (e.g., "https://tenant.atlan.com")
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key; prefer the environment over writing it to disk
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size for table searches
    #[serde(default = "default_search_page_size")]
    pub search_page_size: usize,

    /// Role given admin rights on connections created by this tool
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_search_page_size() -> usize {
    100
}

fn default_admin_role() -> String {
    DEFAULT_ADMIN_ROLE.to_string()
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            search_page_size: default_search_page_size(),
            admin_role: default_admin_role(),
        }
    }
}

/// Object storage (S3) section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Region override; the ambient AWS region is used when unset
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint (e.g., LocalStack or MinIO)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Use path-style addressing, usually needed with custom endpoints
    #[serde(default)]
    pub force_path_style: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub storage: StorageSection,
}

impl HandlerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration pointing at a catalog tenant
    pub fn with_catalog(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            catalog: CatalogSection {
                base_url: Some(base_url.into()),
                api_key: Some(api_key.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Load configuration
    ///
    /// Reads the file at `path` when given, otherwise starts from defaults, then
    /// applies environment variable overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::ReadFailed(path.display().to_string(), e.to_string())
                })?;
                Self::parse(&content)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Path of the configuration file in `dir`, if there is one
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(CONFIG_FILENAME);
        path.is_file().then_some(path)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.catalog.base_url = Some(url);
        }

        if let Some(key) = lookup(ENV_API_KEY) {
            self.catalog.api_key = Some(key);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS)
            && let Ok(timeout) = timeout.parse()
        {
            self.catalog.timeout_secs = timeout;
        }

        if let Some(region) = lookup(ENV_REGION) {
            self.storage.region = Some(region);
        }

        if let Some(endpoint) = lookup(ENV_ENDPOINT_URL) {
            self.storage.endpoint_url = Some(endpoint);
        }
    }

    /// Check that everything needed to reach the catalog is present
    pub fn validate(&self) -> ConfigResult<()> {
        let base_url = self
            .catalog
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("catalog.base_url / ATLAN_BASE_URL"))?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "catalog.base_url",
                reason: format!("'{}' is not an http(s) URL", base_url),
            });
        }

        if self.catalog.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing("catalog.api_key / ATLAN_API_KEY"));
        }

        if self.catalog.search_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "catalog.search_page_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# s3-lineage-sync configuration
# Every value can also be supplied through the environment (see below).

[catalog]
# Tenant URL (ATLAN_BASE_URL)
base_url = "https://tenant.atlan.com"

# API key (ATLAN_API_KEY); keep it in the environment rather than in this file
# api_key = ""

# Request timeout in seconds (ATLAN_TIMEOUT_SECS)
timeout_secs = 30

# Page size used when searching tables for lineage
search_page_size = 100

# Role given admin rights on connections created by upsert_s3_connection
admin_role = "$admin"

[storage]
# Region override (S3_LINEAGE_SYNC_REGION); defaults to the ambient AWS region
# region = "eu-west-1"

# Custom endpoint (S3_LINEAGE_SYNC_ENDPOINT_URL), e.g. LocalStack
# endpoint_url = "http://localhost:4566"
force_path_style = false
"#
}
