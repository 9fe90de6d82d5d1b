//! Atlan REST catalog backend
//!
//! Talks to the tenant's metastore (`/api/meta`) and identity (`/api/service`)
//! endpoints with a bearer API key.
//!
//! # Example
//!
//! ```ignore
//! use s3_lineage_sync::catalog::{AtlanCatalog, CatalogGateway};
//! use s3_lineage_sync::config::HandlerConfig;
//!
//! let config = HandlerConfig::load(None)?;
//! let gateway = CatalogGateway::new(AtlanCatalog::from_config(&config.catalog)?);
//! let tables = gateway
//!     .search_tables_in_schema("default/postgres/1720611661/DB/SCHEMA", "orders")
//!     .await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::{CatalogBackend, CatalogError, CatalogResult, TableSearch};
use crate::config::CatalogSection;
use crate::models::{AssetType, Entity, MutationResponse};

const ENTITY_BULK_PATH: &str = "/api/meta/entity/bulk";
const ENTITY_GUID_PATH: &str = "/api/meta/entity/guid";
const ENTITY_UNIQUE_ATTRIBUTE_PATH: &str = "/api/meta/entity/uniqueAttribute/type";
const INDEX_SEARCH_PATH: &str = "/api/meta/search/indexsearch";
const ROLES_PATH: &str = "/api/service/roles";

/// Single-entity lookup response
#[derive(Debug, Deserialize)]
struct EntityWithExtInfo {
    entity: Option<Entity>,
}

/// Index search response page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexSearchResponse {
    #[serde(default)]
    approximate_count: Option<usize>,
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct RoleRecord {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RolesResponse {
    #[serde(default)]
    records: Vec<RoleRecord>,
}

/// Catalog backend for an Atlan tenant
#[derive(Debug, Clone)]
pub struct AtlanCatalog {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl AtlanCatalog {
    /// Create a backend for `base_url` authenticated with `api_key`
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        page_size: usize,
    ) -> CatalogResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| CatalogError::ConnectionError(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("s3-lineage-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
        })
    }

    /// Create a backend from the `[catalog]` configuration section
    pub fn from_config(config: &CatalogSection) -> CatalogResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| CatalogError::ConnectionError("catalog base URL not set".to_string()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| CatalogError::ConnectionError("catalog API key not set".to_string()))?;

        Self::new(
            base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
            config.search_page_size,
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> CatalogResult<Response> {
        request
            .send()
            .await
            .map_err(|e| CatalogError::ConnectionError(format!("{}: {}", operation, e)))
    }

    /// Turn an error status into [`CatalogError::ApiError`]
    async fn check(operation: &'static str, response: Response) -> CatalogResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::ApiError {
            operation,
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> CatalogResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::InvalidResponse {
                operation,
                reason: e.to_string(),
            })
    }

    /// Run a single-entity lookup, mapping "not found" to `None`
    async fn lookup(
        &self,
        operation: &'static str,
        asset_type: AssetType,
        request: RequestBuilder,
    ) -> CatalogResult<Option<Entity>> {
        let response = self.send(operation, request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(operation, response).await?;
        let body: EntityWithExtInfo = Self::decode(operation, response).await?;

        // an asset of another type is not the asset asked for
        Ok(body.entity.filter(|e| e.type_name == asset_type.type_name()))
    }
}

#[async_trait]
impl CatalogBackend for AtlanCatalog {
    async fn save(&self, entity: &Entity) -> CatalogResult<MutationResponse> {
        const OPERATION: &str = "save";
        let request = self
            .request(Method::POST, ENTITY_BULK_PATH)
            .query(&[
                ("replaceClassifications", "false"),
                ("replaceBusinessAttributes", "false"),
                ("overwriteBusinessAttributes", "false"),
            ])
            .json(&json!({ "entities": [entity] }));

        let response = self.send(OPERATION, request).await?;
        let response = Self::check(OPERATION, response).await?;
        Self::decode(OPERATION, response).await
    }

    async fn get_by_guid(
        &self,
        asset_type: AssetType,
        guid: &Uuid,
    ) -> CatalogResult<Option<Entity>> {
        let request = self
            .request(Method::GET, &format!("{}/{}", ENTITY_GUID_PATH, guid))
            .query(&[("minExtInfo", "true"), ("ignoreRelationships", "true")]);
        self.lookup("get_by_guid", asset_type, request).await
    }

    async fn get_by_qualified_name(
        &self,
        asset_type: AssetType,
        qualified_name: &str,
    ) -> CatalogResult<Option<Entity>> {
        let request = self
            .request(
                Method::GET,
                &format!("{}/{}", ENTITY_UNIQUE_ATTRIBUTE_PATH, asset_type.type_name()),
            )
            .query(&[
                ("attr:qualifiedName", qualified_name),
                ("minExtInfo", "true"),
                ("ignoreRelationships", "true"),
            ]);
        self.lookup("get_by_qualified_name", asset_type, request).await
    }

    async fn purge_by_guid(&self, guid: &Uuid) -> CatalogResult<()> {
        const OPERATION: &str = "purge";
        let guid = guid.to_string();
        let request = self
            .request(Method::DELETE, ENTITY_BULK_PATH)
            .query(&[("guid", guid.as_str()), ("deleteType", "PURGE")]);

        let response = self.send(OPERATION, request).await?;
        Self::check(OPERATION, response).await?;
        Ok(())
    }

    async fn search_tables(&self, search: &TableSearch) -> CatalogResult<Vec<Entity>> {
        const OPERATION: &str = "search";
        let mut tables = Vec::new();
        let mut from = 0;

        loop {
            let request = self
                .request(Method::POST, INDEX_SEARCH_PATH)
                .json(&search.to_request(from, self.page_size));
            let response = self.send(OPERATION, request).await?;
            let response = Self::check(OPERATION, response).await?;
            let page: IndexSearchResponse = Self::decode(OPERATION, response).await?;

            let fetched = page.entities.len();
            tables.extend(page.entities);
            from += fetched;

            let exhausted = page.approximate_count.is_some_and(|total| from >= total);
            if fetched < self.page_size || exhausted {
                break;
            }
        }

        debug!(
            schema = %search.schema_qualified_name,
            pattern = %search.name_pattern,
            count = tables.len(),
            "index search complete"
        );
        Ok(tables)
    }

    async fn role_id(&self, role_name: &str) -> CatalogResult<Option<String>> {
        const OPERATION: &str = "roles";
        let filter = json!({ "name": role_name }).to_string();
        let request = self.request(Method::GET, ROLES_PATH).query(&[
            ("limit", "100"),
            ("offset", "0"),
            ("filter", filter.as_str()),
        ]);

        let response = self.send(OPERATION, request).await?;
        let response = Self::check(OPERATION, response).await?;
        let roles: RolesResponse = Self::decode(OPERATION, response).await?;

        Ok(roles
            .records
            .into_iter()
            .find(|r| r.name == role_name)
            .map(|r| r.id))
    }
}
