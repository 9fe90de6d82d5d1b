//! S3 lineage sync - keeps a metadata catalog in step with S3 data assets
//!
//! Provides:
//! - S3 connection, bucket and object assets in the catalog
//! - Lineage processes linking source tables to S3 objects and S3 objects to target tables
//! - Asset retrieval by guid or qualified name, and purge by guid
//! - A JSON operation envelope (`{"operation": ..., "params": {...}}`) validated before
//!   any external call
//!
//! The catalog and the object store sit behind the [`CatalogBackend`] and
//! [`ObjectLister`] traits; the Atlan and AWS implementations are behind the `atlan`
//! and `s3` features.

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod handler;
pub mod lineage;
pub mod models;
pub mod pattern;
pub mod storage;
pub mod validation;

// Re-export commonly used types
#[cfg(feature = "atlan")]
pub use catalog::AtlanCatalog;
pub use catalog::{CatalogBackend, CatalogError, CatalogGateway, CatalogResult};
pub use config::{ConfigError, HandlerConfig};
#[cfg(all(feature = "atlan", feature = "s3"))]
pub use handler::handle_event_with_config;
pub use handler::{Handler, HandlerError, HandlerResult, OperationResult, Response};
pub use lineage::{LineageError, LineageSync};
pub use pattern::{FileNamePattern, PatternError, ResolvedObject};
#[cfg(feature = "s3")]
pub use storage::S3ObjectLister;
pub use storage::{ObjectLister, StorageError};
pub use validation::{Request, ValidationError, parse_request};

// Re-export models
pub use models::enums::*;
pub use models::{AssetInfo, AssetRef, Entity, UpsertedAssets};
