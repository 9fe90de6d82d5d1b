//! Enums for catalog assets
//!
//! # Serde Casing Conventions
//!
//! - `PascalCase` (no rename): catalog type names, which must match the catalog's
//!   `typeName` exactly (AssetType)
//! - `PascalCase` renamed per variant: connection categories as the catalog spells them
//! - `lowercase`: connector names as they appear inside qualified names (ConnectorType)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset types that can be retrieved through `get_by_guid` / `get_by_qn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Connection,
    S3Bucket,
    S3Object,
    Process,
    Database,
    Schema,
    Table,
}

impl AssetType {
    /// Every supported asset type, in declaration order
    pub const ALL: [AssetType; 7] = [
        AssetType::Connection,
        AssetType::S3Bucket,
        AssetType::S3Object,
        AssetType::Process,
        AssetType::Database,
        AssetType::Schema,
        AssetType::Table,
    ];

    /// The catalog `typeName` for this asset type
    pub fn type_name(&self) -> &'static str {
        match self {
            AssetType::Connection => "Connection",
            AssetType::S3Bucket => "S3Bucket",
            AssetType::S3Object => "S3Object",
            AssetType::Process => "Process",
            AssetType::Database => "Database",
            AssetType::Schema => "Schema",
            AssetType::Table => "Table",
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.type_name() == s)
            .ok_or_else(|| format!("asset_type must be a valid atlan asset type, got '{}'", s))
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Connector behind a connection qualified name (`default/<connector>/<epoch>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    S3,
}

impl ConnectorType {
    pub fn connector_name(&self) -> &'static str {
        match self {
            ConnectorType::S3 => "s3",
        }
    }

    pub fn category(&self) -> ConnectionCategory {
        match self {
            ConnectorType::S3 => ConnectionCategory::ObjectStore,
        }
    }
}

/// Connection category attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionCategory {
    #[serde(rename = "ObjectStore")]
    ObjectStore,
}

impl ConnectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionCategory::ObjectStore => "ObjectStore",
        }
    }
}
