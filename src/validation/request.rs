//! Operation envelope
//!
//! An invocation carries `{"operation": <tag>, "params": {...}}`. Each tag has its own
//! parameter record; [`parse_request`] turns the JSON envelope into a [`Request`] and
//! runs the field checks, so a request that comes out of it is safe to execute.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::input::{
    ValidationError, ValidationResult, validate_file_name_pattern, validate_guid_list,
    validate_required,
};
use crate::models::AssetType;

/// Treat `""` as an absent optional value
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// Parameters of `upsert_s3_connection`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertS3ConnectionParams {
    pub connection_qn: String,
    pub connection_name: String,
    #[serde(default)]
    pub asset_owners: Option<Vec<String>>,
}

/// Parameters of `get_by_guid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetByGuidParams {
    pub guid: Uuid,
    pub asset_type: AssetType,
}

/// Parameters of `get_by_qn`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetByQnParams {
    pub qualified_name: String,
    pub asset_type: AssetType,
}

/// Parameters of `purge`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeParams {
    pub assets_guids: Vec<Uuid>,
}

/// Parameters of `upsert_s3_assets_and_lineage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertS3AssetsAndLineageParams {
    pub s3_connection_qualified_name: String,
    #[serde(default)]
    pub asset_owners: Option<Vec<String>>,
    pub source_connection_qualified_name: String,
    pub source_database_schema_qualified_name: String,
    pub target_connection_qualified_name: String,
    pub target_database_schema_qualified_name: String,
    pub source_extraction_process_name_suffix: String,
    pub source_extraction_process_id_suffix: String,
    pub target_import_process_name_suffix: String,
    pub target_import_process_id_suffix: String,
    pub s3_bucket_name: String,
    pub s3_bucket_arn: String,
    pub qualifier_suffix: String,
    /// Only objects under this prefix are synchronised
    #[serde(default, deserialize_with = "empty_as_none")]
    pub s3_bucket_prefix: Option<String>,
    /// Object key template with a `{table_name}` placeholder
    #[serde(default, deserialize_with = "empty_as_none")]
    pub s3_file_name_pattern: Option<String>,
    /// Source table name template with a `{table_name}` placeholder
    #[serde(default, deserialize_with = "empty_as_none")]
    pub source_table_pattern: Option<String>,
    /// Target table name template with a `{table_name}` placeholder
    #[serde(default, deserialize_with = "empty_as_none")]
    pub target_table_pattern: Option<String>,
}

impl UpsertS3AssetsAndLineageParams {
    fn validate(&self) -> ValidationResult<()> {
        let required = [
            ("s3_connection_qualified_name", &self.s3_connection_qualified_name),
            (
                "source_connection_qualified_name",
                &self.source_connection_qualified_name,
            ),
            (
                "source_database_schema_qualified_name",
                &self.source_database_schema_qualified_name,
            ),
            (
                "target_connection_qualified_name",
                &self.target_connection_qualified_name,
            ),
            (
                "target_database_schema_qualified_name",
                &self.target_database_schema_qualified_name,
            ),
            (
                "source_extraction_process_name_suffix",
                &self.source_extraction_process_name_suffix,
            ),
            (
                "source_extraction_process_id_suffix",
                &self.source_extraction_process_id_suffix,
            ),
            (
                "target_import_process_name_suffix",
                &self.target_import_process_name_suffix,
            ),
            (
                "target_import_process_id_suffix",
                &self.target_import_process_id_suffix,
            ),
            ("s3_bucket_name", &self.s3_bucket_name),
            ("s3_bucket_arn", &self.s3_bucket_arn),
            ("qualifier_suffix", &self.qualifier_suffix),
        ];
        for (field, value) in required {
            validate_required(field, value)?;
        }

        if let Some(pattern) = &self.s3_file_name_pattern {
            validate_file_name_pattern(pattern)?;
        }

        Ok(())
    }
}

/// A validated operation envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "params")]
pub enum Request {
    #[serde(rename = "upsert_s3_connection")]
    UpsertS3Connection(UpsertS3ConnectionParams),
    #[serde(rename = "get_by_guid")]
    GetByGuid(GetByGuidParams),
    #[serde(rename = "get_by_qn")]
    GetByQn(GetByQnParams),
    #[serde(rename = "purge")]
    Purge(PurgeParams),
    #[serde(rename = "upsert_s3_assets_and_lineage")]
    UpsertS3AssetsAndLineage(UpsertS3AssetsAndLineageParams),
}

impl Request {
    /// Operation tag as it appears on the wire
    pub fn operation(&self) -> &'static str {
        match self {
            Request::UpsertS3Connection(_) => "upsert_s3_connection",
            Request::GetByGuid(_) => "get_by_guid",
            Request::GetByQn(_) => "get_by_qn",
            Request::Purge(_) => "purge",
            Request::UpsertS3AssetsAndLineage(_) => "upsert_s3_assets_and_lineage",
        }
    }

    /// Field-level checks that the type system does not cover
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            Request::UpsertS3Connection(params) => {
                validate_required("connection_qn", &params.connection_qn)?;
                validate_required("connection_name", &params.connection_name)
            }
            Request::GetByGuid(_) => Ok(()),
            Request::GetByQn(params) => validate_required("qualified_name", &params.qualified_name),
            Request::Purge(params) => validate_guid_list(&params.assets_guids),
            Request::UpsertS3AssetsAndLineage(params) => params.validate(),
        }
    }
}

/// Parse and validate an operation envelope
pub fn parse_request(event: &Value) -> ValidationResult<Request> {
    let request: Request = serde_json::from_value(event.clone())
        .map_err(|e| ValidationError::Malformed(e.to_string()))?;
    request.validate()?;
    Ok(request)
}
