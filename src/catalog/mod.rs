//! Metadata catalog access
//!
//! Two layers:
//! - [`CatalogBackend`]: raw catalog operations (save, get, purge, search, role lookup).
//!   The Atlan REST implementation lives in [`atlan`] behind the `atlan` feature;
//!   tests plug in an in-memory backend.
//! - [`CatalogGateway`]: domain operations (upsert a bucket, an object, a lineage
//!   process, ...) built on a backend, each returning the single guid the catalog
//!   assigned.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[cfg(feature = "atlan")]
pub mod atlan;
pub mod gateway;
pub mod search;

#[cfg(feature = "atlan")]
pub use atlan::AtlanCatalog;
pub use gateway::CatalogGateway;
pub use search::TableSearch;

use crate::models::{AssetType, Entity, MutationResponse};

/// Errors that can occur during catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to build the HTTP client or reach the catalog
    #[error("Failed to connect to catalog: {0}")]
    ConnectionError(String),

    /// The catalog answered with an error status
    #[error("Catalog request {operation} failed with status {status}: {message}")]
    ApiError {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid catalog response for {operation}: {reason}")]
    InvalidResponse {
        operation: &'static str,
        reason: String,
    },

    /// A save did not assign exactly one guid
    #[error("Expected exactly one guid assignment when saving {qualified_name}, got {count}")]
    UnexpectedGuidAssignments { qualified_name: String, count: usize },

    /// A role required for the operation does not exist
    #[error("Role not found: {0}")]
    RoleNotFound(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Raw catalog operations
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Create or update an entity, matched by type and qualified name
    async fn save(&self, entity: &Entity) -> CatalogResult<MutationResponse>;

    /// Fetch an entity by guid; `None` when nothing of that type has the guid
    async fn get_by_guid(
        &self,
        asset_type: AssetType,
        guid: &Uuid,
    ) -> CatalogResult<Option<Entity>>;

    /// Fetch an entity by qualified name; `None` when there is no such asset
    async fn get_by_qualified_name(
        &self,
        asset_type: AssetType,
        qualified_name: &str,
    ) -> CatalogResult<Option<Entity>>;

    /// Permanently delete an entity
    async fn purge_by_guid(&self, guid: &Uuid) -> CatalogResult<()>;

    /// Active tables matching a search, in catalog order
    async fn search_tables(&self, search: &TableSearch) -> CatalogResult<Vec<Entity>>;

    /// Guid of the role with the given name
    async fn role_id(&self, role_name: &str) -> CatalogResult<Option<String>>;
}

#[async_trait]
impl<B: CatalogBackend + ?Sized> CatalogBackend for Arc<B> {
    async fn save(&self, entity: &Entity) -> CatalogResult<MutationResponse> {
        (**self).save(entity).await
    }

    async fn get_by_guid(
        &self,
        asset_type: AssetType,
        guid: &Uuid,
    ) -> CatalogResult<Option<Entity>> {
        (**self).get_by_guid(asset_type, guid).await
    }

    async fn get_by_qualified_name(
        &self,
        asset_type: AssetType,
        qualified_name: &str,
    ) -> CatalogResult<Option<Entity>> {
        (**self).get_by_qualified_name(asset_type, qualified_name).await
    }

    async fn purge_by_guid(&self, guid: &Uuid) -> CatalogResult<()> {
        (**self).purge_by_guid(guid).await
    }

    async fn search_tables(&self, search: &TableSearch) -> CatalogResult<Vec<Entity>> {
        (**self).search_tables(search).await
    }

    async fn role_id(&self, role_name: &str) -> CatalogResult<Option<String>> {
        (**self).role_id(role_name).await
    }
}

/// Extract the single guid assigned by a save
///
/// Every upsert in this crate saves exactly one entity, so exactly one assignment is
/// expected; anything else means the catalog did something unexpected and is an error.
pub fn single_assigned_guid(
    response: &MutationResponse,
    qualified_name: &str,
) -> CatalogResult<String> {
    let mut assigned = response.guid_assignments.values();
    match (assigned.next(), assigned.next()) {
        (Some(guid), None) => Ok(guid.clone()),
        _ => Err(CatalogError::UnexpectedGuidAssignments {
            qualified_name: qualified_name.to_string(),
            count: response.guid_assignments.len(),
        }),
    }
}
