//! Typed asset builders
//!
//! Each builder knows the identity rules of one asset type and renders itself into
//! a catalog [`Entity`] ready for an upsert. Saving the same qualified name twice
//! updates the existing asset instead of creating a new one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::entity::{AssetRef, Entity};
use super::enums::{AssetType, ConnectorType};

/// Connection qualified names look like `default/<connector>/<epoch>`
static CONNECTION_QN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/]+/([^/]+)/[^/]+").expect("valid connection pattern"));

/// Extract the connector name segment from a connection qualified name
///
/// # Examples
///
/// ```
/// use s3_lineage_sync::models::asset::connector_name;
///
/// assert_eq!(connector_name("default/postgres/1720611661"), Some("postgres"));
/// assert_eq!(connector_name("postgres"), None);
/// ```
pub fn connector_name(connection_qualified_name: &str) -> Option<&str> {
    CONNECTION_QN
        .captures(connection_qualified_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Common behaviour of assets this crate can upsert
pub trait CatalogAsset {
    fn asset_type(&self) -> AssetType;

    /// Unique identity key of the asset
    fn qualified_name(&self) -> String;

    /// Render the asset as an unsaved catalog entity
    fn to_entity(&self) -> Entity;
}

fn owners_value(owners: &Option<Vec<String>>) -> Option<Value> {
    owners.as_ref().map(|o| Value::from(o.clone()))
}

/// S3 (object store) connection
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionAsset {
    pub name: String,
    pub qualified_name: String,
    pub connector: ConnectorType,
    /// Guids of the roles allowed to administer the connection
    pub admin_roles: Vec<String>,
    pub owners: Option<Vec<String>>,
}

impl CatalogAsset for ConnectionAsset {
    fn asset_type(&self) -> AssetType {
        AssetType::Connection
    }

    fn qualified_name(&self) -> String {
        self.qualified_name.clone()
    }

    fn to_entity(&self) -> Entity {
        let mut entity = Entity::new(self.asset_type().type_name(), &self.qualified_name);
        entity
            .set("name", self.name.as_str())
            .set("connectorName", self.connector.connector_name())
            .set("category", self.connector.category().as_str())
            .set("adminRoles", self.admin_roles.clone())
            .set_opt("ownerUsers", owners_value(&self.owners));
        entity
    }
}

/// S3 bucket
#[derive(Debug, Clone, PartialEq)]
pub struct S3BucketAsset {
    pub name: String,
    pub connection_qualified_name: String,
    /// Catalog-facing ARN (raw bucket ARN plus qualifier suffix)
    pub aws_arn: String,
    pub object_count: usize,
    pub owners: Option<Vec<String>>,
}

impl CatalogAsset for S3BucketAsset {
    fn asset_type(&self) -> AssetType {
        AssetType::S3Bucket
    }

    fn qualified_name(&self) -> String {
        format!("{}/{}", self.connection_qualified_name, self.aws_arn)
    }

    fn to_entity(&self) -> Entity {
        let mut entity = Entity::new(self.asset_type().type_name(), self.qualified_name());
        entity
            .set("name", self.name.as_str())
            .set("connectionQualifiedName", self.connection_qualified_name.as_str())
            .set("connectorName", ConnectorType::S3.connector_name())
            .set("awsArn", self.aws_arn.as_str())
            .set("s3ObjectCount", self.object_count as u64)
            .set_opt("ownerUsers", owners_value(&self.owners));
        entity
    }
}

/// S3 object inside a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct S3ObjectAsset {
    /// Object key, also used as the display name
    pub key: String,
    pub connection_qualified_name: String,
    pub bucket_name: String,
    pub bucket_qualified_name: String,
    /// Catalog-facing ARN of the bucket the object lives in
    pub bucket_aws_arn: String,
    pub owners: Option<Vec<String>>,
}

impl S3ObjectAsset {
    pub fn aws_arn(&self) -> String {
        format!("{}/{}", self.bucket_aws_arn, self.key)
    }
}

impl CatalogAsset for S3ObjectAsset {
    fn asset_type(&self) -> AssetType {
        AssetType::S3Object
    }

    fn qualified_name(&self) -> String {
        format!("{}/{}", self.bucket_qualified_name, self.key)
    }

    fn to_entity(&self) -> Entity {
        let bucket = AssetRef::by_qualified_name(
            AssetType::S3Bucket.type_name(),
            self.bucket_qualified_name.as_str(),
        );
        let mut entity = Entity::new(self.asset_type().type_name(), self.qualified_name());
        entity
            .set("name", self.key.as_str())
            .set("connectionQualifiedName", self.connection_qualified_name.as_str())
            .set("connectorName", ConnectorType::S3.connector_name())
            .set("awsArn", self.aws_arn())
            .set("s3BucketName", self.bucket_name.as_str())
            .set("s3BucketQualifiedName", self.bucket_qualified_name.as_str())
            .set("bucket", bucket)
            .set_opt("ownerUsers", owners_value(&self.owners));
        entity
    }
}

/// Lineage process linking input assets to output assets
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessAsset {
    pub name: String,
    /// Identifier of the process within its connection
    pub process_id: String,
    pub connection_qualified_name: String,
    pub inputs: Vec<AssetRef>,
    pub outputs: Vec<AssetRef>,
    pub owners: Option<Vec<String>>,
}

impl CatalogAsset for ProcessAsset {
    fn asset_type(&self) -> AssetType {
        AssetType::Process
    }

    fn qualified_name(&self) -> String {
        format!("{}/{}", self.connection_qualified_name, self.process_id)
    }

    fn to_entity(&self) -> Entity {
        let inputs: Vec<Value> = self.inputs.iter().cloned().map(Value::from).collect();
        let outputs: Vec<Value> = self.outputs.iter().cloned().map(Value::from).collect();

        let mut entity = Entity::new(self.asset_type().type_name(), self.qualified_name());
        entity
            .set("name", self.name.as_str())
            .set("connectionQualifiedName", self.connection_qualified_name.as_str())
            .set_opt(
                "connectorName",
                connector_name(&self.connection_qualified_name),
            )
            .set("inputs", inputs)
            .set("outputs", outputs)
            .set_opt("ownerUsers", owners_value(&self.owners));
        entity
    }
}
