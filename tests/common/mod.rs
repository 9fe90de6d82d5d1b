//! In-memory catalog and object store used by the integration tests
//!
//! Both fakes write every call into a shared [`CallLog`] so a test can assert what
//! was (or was not) sent to the outside world, and in which order.

#![allow(dead_code)]

use async_trait::async_trait;
use regex::RegexBuilder;
use s3_lineage_sync::catalog::{
    CatalogBackend, CatalogError, CatalogGateway, CatalogResult, TableSearch,
};
use s3_lineage_sync::models::{AssetType, Entity, MutationResponse};
use s3_lineage_sync::storage::{ObjectLister, StorageError, StorageResult};
use s3_lineage_sync::{Handler, HandlerError};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const S3_CONNECTION_QN: &str = "default/s3/1720796029";
pub const SOURCE_CONNECTION_QN: &str = "default/postgres/1720611661";
pub const SOURCE_SCHEMA_QN: &str = "default/postgres/1720611661/SALES_DB/PUBLIC";
pub const TARGET_CONNECTION_QN: &str = "default/snowflake/1720612035";
pub const TARGET_SCHEMA_QN: &str = "default/snowflake/1720612035/ANALYTICS/RAW";
pub const ADMIN_ROLE_ID: &str = "0c4d1b71-3d49-4f5c-9b5f-0a3e3a2f7a11";

/// One external call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Save { type_name: String, qualified_name: String },
    GetByGuid(Uuid),
    GetByQualifiedName(String),
    Purge(Uuid),
    Search { schema: String, pattern: String },
    RoleId(String),
    ListKeys { bucket: String, prefix: Option<String> },
}

#[derive(Debug, Default)]
pub struct CallLog(Mutex<Vec<Call>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    pub fn saves_of(&self, asset_type: AssetType) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Save {
                    type_name,
                    qualified_name,
                } if type_name == asset_type.type_name() => Some(qualified_name),
                _ => None,
            })
            .collect()
    }
}

/// Guid the fake catalog assigns to a qualified name
pub fn guid_for(qualified_name: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, qualified_name.as_bytes()).to_string()
}

/// A saved table, as returned by a search
pub fn table(schema_qualified_name: &str, name: &str) -> Entity {
    let qualified_name = format!("{}/{}", schema_qualified_name, name);
    let mut entity = Entity {
        type_name: AssetType::Table.type_name().to_string(),
        guid: Some(guid_for(&qualified_name)),
        status: Some("ACTIVE".to_string()),
        ..Default::default()
    };
    entity
        .set("name", name)
        .set("qualifiedName", qualified_name);
    entity
}

/// Catalog double keyed by qualified name
pub struct FakeCatalog {
    log: Arc<CallLog>,
    entities: Mutex<HashMap<String, Entity>>,
    tables: Vec<Entity>,
    role: Option<String>,
    fail_save: Option<String>,
    fail_purge: Option<Uuid>,
}

impl FakeCatalog {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            entities: Mutex::new(HashMap::new()),
            tables: Vec::new(),
            role: Some(ADMIN_ROLE_ID.to_string()),
            fail_save: None,
            fail_purge: None,
        }
    }

    pub fn with_tables(mut self, tables: Vec<Entity>) -> Self {
        self.tables = tables;
        self
    }

    pub fn without_admin_role(mut self) -> Self {
        self.role = None;
        self
    }

    /// Reject saves of this qualified name
    pub fn failing_save(mut self, qualified_name: &str) -> Self {
        self.fail_save = Some(qualified_name.to_string());
        self
    }

    pub fn failing_purge(mut self, guid: Uuid) -> Self {
        self.fail_purge = Some(guid);
        self
    }

    /// Insert an entity as if it had been saved earlier
    pub fn with_entity(self, mut entity: Entity) -> Self {
        let qualified_name = entity.qualified_name().unwrap_or_default().to_string();
        entity.guid = Some(guid_for(&qualified_name));
        self.entities
            .lock()
            .unwrap()
            .insert(qualified_name, entity);
        self
    }

    pub fn saved(&self, qualified_name: &str) -> Option<Entity> {
        self.entities.lock().unwrap().get(qualified_name).cloned()
    }
}

fn api_error(operation: &'static str) -> CatalogError {
    CatalogError::ApiError {
        operation,
        status: 500,
        message: "injected failure".to_string(),
    }
}

#[async_trait]
impl CatalogBackend for FakeCatalog {
    async fn save(&self, entity: &Entity) -> CatalogResult<MutationResponse> {
        let qualified_name = entity.qualified_name().unwrap_or_default().to_string();
        self.log.record(Call::Save {
            type_name: entity.type_name.clone(),
            qualified_name: qualified_name.clone(),
        });
        if self.fail_save.as_deref() == Some(qualified_name.as_str()) {
            return Err(api_error("save"));
        }

        let guid = guid_for(&qualified_name);
        let placeholder = entity.guid.clone().unwrap_or_default();
        let mut stored = entity.clone();
        stored.guid = Some(guid.clone());
        self.entities
            .lock()
            .unwrap()
            .insert(qualified_name, stored);

        Ok(MutationResponse {
            guid_assignments: BTreeMap::from([(placeholder, guid)]),
            mutated_entities: None,
        })
    }

    async fn get_by_guid(
        &self,
        asset_type: AssetType,
        guid: &Uuid,
    ) -> CatalogResult<Option<Entity>> {
        self.log.record(Call::GetByGuid(*guid));
        let guid = guid.to_string();
        Ok(self
            .entities
            .lock()
            .unwrap()
            .values()
            .find(|e| e.guid.as_deref() == Some(guid.as_str()))
            .filter(|e| e.type_name == asset_type.type_name())
            .cloned())
    }

    async fn get_by_qualified_name(
        &self,
        asset_type: AssetType,
        qualified_name: &str,
    ) -> CatalogResult<Option<Entity>> {
        self.log
            .record(Call::GetByQualifiedName(qualified_name.to_string()));
        Ok(self
            .entities
            .lock()
            .unwrap()
            .get(qualified_name)
            .filter(|e| e.type_name == asset_type.type_name())
            .cloned())
    }

    async fn purge_by_guid(&self, guid: &Uuid) -> CatalogResult<()> {
        self.log.record(Call::Purge(*guid));
        if self.fail_purge == Some(*guid) {
            return Err(api_error("purge"));
        }
        let guid = guid.to_string();
        self.entities
            .lock()
            .unwrap()
            .retain(|_, e| e.guid.as_deref() != Some(guid.as_str()));
        Ok(())
    }

    async fn search_tables(&self, search: &TableSearch) -> CatalogResult<Vec<Entity>> {
        self.log.record(Call::Search {
            schema: search.schema_qualified_name.clone(),
            pattern: search.name_pattern.clone(),
        });
        let name = RegexBuilder::new(&format!("^(?:{})$", search.name_pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| CatalogError::InvalidResponse {
                operation: "search",
                reason: e.to_string(),
            })?;

        Ok(self
            .tables
            .iter()
            .filter(|t| {
                t.qualified_name()
                    .is_some_and(|qn| qn.starts_with(&search.schema_qualified_name))
                    && t.name().is_some_and(|n| name.is_match(n))
            })
            .cloned()
            .collect())
    }

    async fn role_id(&self, role_name: &str) -> CatalogResult<Option<String>> {
        self.log.record(Call::RoleId(role_name.to_string()));
        Ok(self.role.clone())
    }
}

/// Object store double returning a fixed key listing
pub struct FakeLister {
    log: Arc<CallLog>,
    keys: Vec<String>,
    missing_bucket: bool,
}

impl FakeLister {
    pub fn new(log: Arc<CallLog>, keys: &[&str]) -> Self {
        Self {
            log,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            missing_bucket: false,
        }
    }

    pub fn missing_bucket(mut self) -> Self {
        self.missing_bucket = true;
        self
    }
}

#[async_trait]
impl ObjectLister for FakeLister {
    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<String>> {
        self.log.record(Call::ListKeys {
            bucket: bucket.to_string(),
            prefix: prefix.map(str::to_string),
        });
        if self.missing_bucket {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        Ok(self
            .keys
            .iter()
            .filter(|k| prefix.is_none_or(|p| k.starts_with(p)))
            .cloned()
            .collect())
    }
}

pub fn handler(catalog: FakeCatalog, lister: FakeLister) -> Handler<FakeCatalog, FakeLister> {
    Handler::new(CatalogGateway::new(catalog), lister)
}

/// Parameters of a lineage run over the `sales-data` bucket
pub fn lineage_params() -> Value {
    json!({
        "s3_connection_qualified_name": S3_CONNECTION_QN,
        "asset_owners": ["mag.i"],
        "source_connection_qualified_name": SOURCE_CONNECTION_QN,
        "source_database_schema_qualified_name": SOURCE_SCHEMA_QN,
        "target_connection_qualified_name": TARGET_CONNECTION_QN,
        "target_database_schema_qualified_name": TARGET_SCHEMA_QN,
        "source_extraction_process_name_suffix": "pg to s3 process",
        "source_extraction_process_id_suffix": "pg_to_s3_process",
        "target_import_process_name_suffix": "s3 to snflk process",
        "target_import_process_id_suffix": "s3_to_snflk_process",
        "s3_bucket_name": "sales-data",
        "s3_bucket_arn": "arn:aws:s3:::sales-data",
        "qualifier_suffix": "mag",
        "s3_file_name_pattern": "sales/{table_name}_2024.csv"
    })
}

pub fn lineage_event(params: Value) -> Value {
    json!({"operation": "upsert_s3_assets_and_lineage", "params": params})
}

pub fn is_validation_error(err: &HandlerError) -> bool {
    matches!(err, HandlerError::Validation(_))
}
