//! Validation functionality
//!
//! Provides validation logic for:
//! - Operation envelopes (known operation, parameter shapes)
//! - Input validation (required values, UUIDs, asset types, file-name patterns)
//!
//! Validation never reaches the network: a rejected request has had no side effects.

pub mod input;
pub mod request;

pub use input::{
    ValidationError, ValidationResult, validate_asset_type, validate_required, validate_uuid,
};
pub use request::{
    GetByGuidParams, GetByQnParams, PurgeParams, Request, UpsertS3AssetsAndLineageParams,
    UpsertS3ConnectionParams, parse_request,
};
