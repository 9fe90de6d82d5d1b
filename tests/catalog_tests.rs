//! Catalog gateway behaviour over an in-memory backend

mod common;

use async_trait::async_trait;
use common::*;
use s3_lineage_sync::catalog::{
    CatalogBackend, CatalogError, CatalogGateway, CatalogResult, TableSearch,
};
use s3_lineage_sync::models::{
    AssetType, Entity, MutationResponse, S3BucketAsset,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Backend whose saves report a fixed set of guid assignments
struct FixedAssignments(BTreeMap<String, String>);

#[async_trait]
impl CatalogBackend for FixedAssignments {
    async fn save(&self, _entity: &Entity) -> CatalogResult<MutationResponse> {
        Ok(MutationResponse {
            guid_assignments: self.0.clone(),
            mutated_entities: None,
        })
    }

    async fn get_by_guid(&self, _: AssetType, _: &Uuid) -> CatalogResult<Option<Entity>> {
        Ok(None)
    }

    async fn get_by_qualified_name(&self, _: AssetType, _: &str) -> CatalogResult<Option<Entity>> {
        Ok(None)
    }

    async fn purge_by_guid(&self, _: &Uuid) -> CatalogResult<()> {
        Ok(())
    }

    async fn search_tables(&self, _: &TableSearch) -> CatalogResult<Vec<Entity>> {
        Ok(Vec::new())
    }

    async fn role_id(&self, _: &str) -> CatalogResult<Option<String>> {
        Ok(None)
    }
}

fn bucket() -> S3BucketAsset {
    S3BucketAsset {
        name: "sales-data".to_string(),
        connection_qualified_name: S3_CONNECTION_QN.to_string(),
        aws_arn: "arn:aws:s3:::sales-data-mag".to_string(),
        object_count: 0,
        owners: None,
    }
}

#[tokio::test]
async fn test_upsert_requires_exactly_one_assignment() {
    let none = CatalogGateway::new(FixedAssignments(BTreeMap::new()));
    assert!(matches!(
        none.upsert(&bucket()).await,
        Err(CatalogError::UnexpectedGuidAssignments { count: 0, .. })
    ));

    let two = CatalogGateway::new(FixedAssignments(BTreeMap::from([
        ("-1".to_string(), "a".to_string()),
        ("-2".to_string(), "b".to_string()),
    ])));
    assert!(matches!(
        two.upsert(&bucket()).await,
        Err(CatalogError::UnexpectedGuidAssignments { count: 2, .. })
    ));

    let one = CatalogGateway::new(FixedAssignments(BTreeMap::from([(
        "-1".to_string(),
        "a".to_string(),
    )])));
    assert_eq!(one.upsert(&bucket()).await.unwrap(), "a");
}

#[tokio::test]
async fn test_search_keeps_only_tables() {
    let log = Arc::new(CallLog::default());
    let mut view = table(SOURCE_SCHEMA_QN, "ORDERS_V");
    view.type_name = "View".to_string();
    let gateway = CatalogGateway::new(
        FakeCatalog::new(log.clone()).with_tables(vec![table(SOURCE_SCHEMA_QN, "ORDERS"), view]),
    );

    let tables = gateway
        .search_tables_in_schema(SOURCE_SCHEMA_QN, "orders.*")
        .await
        .unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name(), Some("ORDERS"));
}

#[tokio::test]
async fn test_custom_admin_role_is_looked_up() {
    let log = Arc::new(CallLog::default());
    let gateway =
        CatalogGateway::new(FakeCatalog::new(log.clone())).with_admin_role("$data_steward");

    gateway
        .upsert_s3_connection("aws-s3", S3_CONNECTION_QN, None)
        .await
        .unwrap();
    assert_eq!(log.calls()[0], Call::RoleId("$data_steward".to_string()));

    let connection = gateway.backend().saved(S3_CONNECTION_QN).unwrap();
    assert!(!connection.attributes.contains_key("ownerUsers"));
}

#[tokio::test]
async fn test_purge_returns_canonical_guids() {
    let log = Arc::new(CallLog::default());
    let gateway = CatalogGateway::new(FakeCatalog::new(log.clone()));
    let guid = Uuid::parse_str("82C11978-E115-4D4F-88C4-06BE25A99127").unwrap();

    assert_eq!(
        gateway.purge(&[guid]).await.unwrap(),
        vec!["82c11978-e115-4d4f-88c4-06be25a99127".to_string()]
    );
}
