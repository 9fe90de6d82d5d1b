//! Input validation utilities.
//!
//! Field-level checks applied to operation parameters before anything touches the
//! catalog or object storage. All checks are pure: no network access, no I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AssetType;
use crate::pattern::FileNamePattern;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// The envelope does not have the shape of any known operation
    #[error("invalid request: {0}")]
    Malformed(String),

    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a required string parameter: it must not be empty.
///
/// Length is not capped; object qualified names embed S3 keys of up to 1024 bytes.
///
/// # Examples
///
/// ```
/// use s3_lineage_sync::validation::input::validate_required;
///
/// assert!(validate_required("connection_qn", "default/s3/1720796029").is_ok());
/// assert!(validate_required("connection_qn", "").is_err());
/// ```
pub fn validate_required(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// Validate a UUID string.
///
/// # Examples
///
/// ```
/// use s3_lineage_sync::validation::input::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| ValidationError::InvalidFormat("UUID", format!("invalid UUID format: {}", e)))
}

/// Validate an asset type tag.
///
/// # Examples
///
/// ```
/// use s3_lineage_sync::validation::input::validate_asset_type;
///
/// assert!(validate_asset_type("S3Bucket").is_ok());
/// assert!(validate_asset_type("s3bucket").is_err());
/// ```
pub fn validate_asset_type(asset_type: &str) -> ValidationResult<AssetType> {
    asset_type
        .parse()
        .map_err(|reason| ValidationError::InvalidFormat("asset_type", reason))
}

/// Validate a guid list: at least one entry.
pub fn validate_guid_list(guids: &[Uuid]) -> ValidationResult<()> {
    if guids.is_empty() {
        return Err(ValidationError::Empty("assets_guids"));
    }
    Ok(())
}

/// Validate that a file-name pattern compiles.
pub fn validate_file_name_pattern(pattern: &str) -> ValidationResult<()> {
    FileNamePattern::new(pattern)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidFormat("s3_file_name_pattern", e.to_string()))
}
