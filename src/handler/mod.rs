//! Operation dispatcher
//!
//! One invocation is validate, execute, respond. A request is fully validated before
//! the catalog or the object store is touched; after that the first failing external
//! call fails the whole invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::catalog::{CatalogBackend, CatalogError, CatalogGateway};
use crate::config::ConfigError;
use crate::lineage::{LineageError, LineageSync};
use crate::models::{AssetInfo, UpsertedAssets};
use crate::storage::{ObjectLister, StorageError};
use crate::validation::{Request, ValidationError, parse_request};

/// Status code of every successful invocation
pub const STATUS_OK: u16 = 200;

/// Errors that fail an invocation
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Lineage error: {0}")]
    Lineage(#[from] LineageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Operation-specific part of the response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    S3ConnectionGuid(String),
    UpsertedAssets(UpsertedAssets),
    AssetInfo(AssetInfo),
    PurgedAssets(Vec<String>),
}

/// Response body: the operation tag plus its result field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub operation: String,
    #[serde(flatten)]
    pub result: OperationResult,
}

/// Invocation response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

impl Response {
    pub fn ok(operation: &str, result: OperationResult) -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResponseBody {
                operation: operation.to_string(),
                result,
            },
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Dispatcher over a catalog gateway and an object lister
pub struct Handler<B: CatalogBackend, L: ObjectLister> {
    gateway: CatalogGateway<B>,
    lister: L,
}

impl<B: CatalogBackend, L: ObjectLister> Handler<B, L> {
    pub fn new(gateway: CatalogGateway<B>, lister: L) -> Self {
        Self { gateway, lister }
    }

    pub fn gateway(&self) -> &CatalogGateway<B> {
        &self.gateway
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Validate a raw JSON envelope and run it
    pub async fn handle_event(&self, event: &Value) -> HandlerResult<Response> {
        let request = parse_request(event)?;
        self.handle(request).await
    }

    /// Run an already-parsed request
    ///
    /// The request is validated again so that hand-built requests get the same
    /// guarantees as parsed ones.
    pub async fn handle(&self, request: Request) -> HandlerResult<Response> {
        request.validate()?;
        let operation = request.operation();
        info!(operation, "handling request");

        let result = match request {
            Request::UpsertS3Connection(params) => OperationResult::S3ConnectionGuid(
                self.gateway
                    .upsert_s3_connection(
                        &params.connection_name,
                        &params.connection_qn,
                        params.asset_owners,
                    )
                    .await?,
            ),
            Request::GetByGuid(params) => OperationResult::AssetInfo(AssetInfo::from(
                self.gateway
                    .get_by_guid(params.asset_type, &params.guid)
                    .await?,
            )),
            Request::GetByQn(params) => OperationResult::AssetInfo(AssetInfo::from(
                self.gateway
                    .get_by_qualified_name(params.asset_type, &params.qualified_name)
                    .await?,
            )),
            Request::Purge(params) => {
                OperationResult::PurgedAssets(self.gateway.purge(&params.assets_guids).await?)
            }
            Request::UpsertS3AssetsAndLineage(params) => OperationResult::UpsertedAssets(
                LineageSync::new(&self.gateway, &self.lister)
                    .run(&params)
                    .await?,
            ),
        };

        info!(operation, "request complete");
        Ok(Response::ok(operation, result))
    }
}

#[cfg(all(feature = "atlan", feature = "s3"))]
mod live {
    use serde_json::Value;

    use super::{Handler, HandlerResult, Response};
    use crate::catalog::{AtlanCatalog, CatalogGateway};
    use crate::config::HandlerConfig;
    use crate::storage::S3ObjectLister;
    use crate::validation::parse_request;

    impl Handler<AtlanCatalog, S3ObjectLister> {
        /// Build the Atlan and S3 clients described by `config`
        pub async fn from_config(config: &HandlerConfig) -> HandlerResult<Self> {
            config.validate()?;
            let catalog = AtlanCatalog::from_config(&config.catalog)?;
            let gateway = CatalogGateway::new(catalog).with_admin_role(&config.catalog.admin_role);
            let lister = S3ObjectLister::from_config(&config.storage).await?;
            Ok(Self::new(gateway, lister))
        }
    }

    /// Validate `event`, then build live clients and run it
    ///
    /// Nothing is constructed for an invalid event.
    pub async fn handle_event_with_config(
        config: &HandlerConfig,
        event: &Value,
    ) -> HandlerResult<Response> {
        let request = parse_request(event)?;
        let handler = Handler::from_config(config).await?;
        handler.handle(request).await
    }
}

#[cfg(all(feature = "atlan", feature = "s3"))]
pub use live::handle_event_with_config;
