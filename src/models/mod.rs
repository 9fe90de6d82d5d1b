//! Models module
//!
//! Defines the catalog entity wire model, typed asset builders and the payloads
//! returned to the caller of the handler.

pub mod asset;
pub mod entity;
pub mod enums;
pub mod result;

pub use asset::{CatalogAsset, ConnectionAsset, ProcessAsset, S3BucketAsset, S3ObjectAsset};
pub use entity::{AssetRef, Classification, Entity, MutationResponse};
pub use enums::*;
pub use result::{AssetInfo, UpsertedAssets};
