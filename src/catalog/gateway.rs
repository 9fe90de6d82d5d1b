//! Catalog gateway
//!
//! Domain-level catalog operations used by the handler and the lineage workflow.

use tracing::{debug, info};
use uuid::Uuid;

use super::{CatalogBackend, CatalogError, CatalogResult, TableSearch, single_assigned_guid};
use crate::config::DEFAULT_ADMIN_ROLE;
use crate::models::{AssetType, CatalogAsset, ConnectionAsset, ConnectorType, Entity};

/// Catalog gateway wrapping a [`CatalogBackend`]
pub struct CatalogGateway<B: CatalogBackend> {
    backend: B,
    admin_role: String,
}

impl<B: CatalogBackend> CatalogGateway<B> {
    /// Create a new gateway with the given backend
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
        }
    }

    /// Use a different role as connection admin
    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = role.into();
        self
    }

    /// Get reference to the catalog backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create or update an asset and return the guid the catalog assigned to it
    pub async fn upsert<A: CatalogAsset + ?Sized>(&self, asset: &A) -> CatalogResult<String> {
        let qualified_name = asset.qualified_name();
        let entity = asset.to_entity();
        let response = self.backend.save(&entity).await?;
        let guid = single_assigned_guid(&response, &qualified_name)?;
        debug!(
            asset_type = %asset.asset_type(),
            qualified_name = %qualified_name,
            guid = %guid,
            "upserted asset"
        );
        Ok(guid)
    }

    /// Create or update an S3 connection administered by the configured admin role
    pub async fn upsert_s3_connection(
        &self,
        name: &str,
        qualified_name: &str,
        owners: Option<Vec<String>>,
    ) -> CatalogResult<String> {
        let admin_role_id = self
            .backend
            .role_id(&self.admin_role)
            .await?
            .ok_or_else(|| CatalogError::RoleNotFound(self.admin_role.clone()))?;

        let connection = ConnectionAsset {
            name: name.to_string(),
            qualified_name: qualified_name.to_string(),
            connector: ConnectorType::S3,
            admin_roles: vec![admin_role_id],
            owners,
        };
        let guid = self.upsert(&connection).await?;
        info!(qualified_name, guid = %guid, "upserted s3 connection");
        Ok(guid)
    }

    /// Retrieve an asset by guid; `None` when it does not exist
    pub async fn get_by_guid(
        &self,
        asset_type: AssetType,
        guid: &Uuid,
    ) -> CatalogResult<Option<Entity>> {
        let entity = self.backend.get_by_guid(asset_type, guid).await?;
        if entity.is_none() {
            info!(%asset_type, %guid, "asset not found");
        }
        Ok(entity)
    }

    /// Retrieve an asset by qualified name; `None` when it does not exist
    pub async fn get_by_qualified_name(
        &self,
        asset_type: AssetType,
        qualified_name: &str,
    ) -> CatalogResult<Option<Entity>> {
        let entity = self
            .backend
            .get_by_qualified_name(asset_type, qualified_name)
            .await?;
        if entity.is_none() {
            info!(%asset_type, qualified_name, "asset not found");
        }
        Ok(entity)
    }

    /// Purge assets one by one, in order; the first failure aborts
    ///
    /// Returns the purged guids in canonical string form.
    pub async fn purge(&self, guids: &[Uuid]) -> CatalogResult<Vec<String>> {
        let mut purged = Vec::with_capacity(guids.len());
        for guid in guids {
            self.backend.purge_by_guid(guid).await?;
            info!(%guid, "purged asset");
            purged.push(guid.to_string());
        }
        Ok(purged)
    }

    /// Active tables under a schema whose name matches `name_pattern`
    pub async fn search_tables_in_schema(
        &self,
        schema_qualified_name: &str,
        name_pattern: &str,
    ) -> CatalogResult<Vec<Entity>> {
        let search = TableSearch::new(schema_qualified_name, name_pattern);
        let tables: Vec<Entity> = self
            .backend
            .search_tables(&search)
            .await?
            .into_iter()
            .filter(|e| e.type_name == AssetType::Table.type_name())
            .collect();
        debug!(
            schema = schema_qualified_name,
            pattern = name_pattern,
            count = tables.len(),
            "searched tables"
        );
        Ok(tables)
    }
}
