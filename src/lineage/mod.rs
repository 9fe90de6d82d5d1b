//! Bucket, object and lineage synchronisation
//!
//! For one bucket:
//! 1. list the object keys (optionally under a prefix) and infer a table name for
//!    each key
//! 2. upsert the bucket asset with the number of resolved objects
//! 3. for each object, in listing order: upsert the object asset, then link it to the
//!    matching source tables (source -> object) and the matching target tables
//!    (object -> target) through lineage processes
//!
//! The first failing catalog or storage call aborts the run; nothing is retried.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogBackend, CatalogError, CatalogGateway};
use crate::models::{
    AssetRef, AssetType, CatalogAsset, Entity, ProcessAsset, S3BucketAsset, S3ObjectAsset,
    UpsertedAssets,
};
use crate::pattern::{
    FileNamePattern, PatternError, ResolvedObject, apply_table_pattern, resolve_table_names,
};
use crate::storage::{ObjectLister, StorageError};
use crate::validation::UpsertS3AssetsAndLineageParams;

/// Errors that abort a synchronisation run
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
}

/// Result type for lineage operations
pub type LineageResult<T> = Result<T, LineageError>;

/// Which side of the object a lineage process sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageDirection {
    /// Source tables feed the object (extraction)
    SourceToObject,
    /// The object feeds target tables (import)
    ObjectToTarget,
}

impl LineageDirection {
    /// Joins the table name and the id suffix in a process id
    ///
    /// Import processes are keyed `{table} {suffix}` in the catalog; the space is
    /// part of their identity.
    pub fn process_id_separator(&self) -> &'static str {
        match self {
            LineageDirection::SourceToObject => "_",
            LineageDirection::ObjectToTarget => " ",
        }
    }
}

/// Lineage workflow over a catalog gateway and an object lister
pub struct LineageSync<'a, B: CatalogBackend, L: ObjectLister> {
    gateway: &'a CatalogGateway<B>,
    lister: &'a L,
}

impl<'a, B: CatalogBackend, L: ObjectLister> LineageSync<'a, B, L> {
    pub fn new(gateway: &'a CatalogGateway<B>, lister: &'a L) -> Self {
        Self { gateway, lister }
    }

    /// Run the workflow for one bucket
    pub async fn run(
        &self,
        params: &UpsertS3AssetsAndLineageParams,
    ) -> LineageResult<UpsertedAssets> {
        let pattern = params
            .s3_file_name_pattern
            .as_deref()
            .map(FileNamePattern::new)
            .transpose()?;

        info!(bucket = %params.s3_bucket_name, "fetching s3 object names");
        let keys = self
            .lister
            .list_keys(&params.s3_bucket_name, params.s3_bucket_prefix.as_deref())
            .await?;
        let objects = resolve_table_names(&keys, pattern.as_ref());
        debug!(
            listed = keys.len(),
            resolved = objects.len(),
            "resolved table names"
        );
        if objects.is_empty() && !keys.is_empty() {
            warn!(
                bucket = %params.s3_bucket_name,
                pattern = ?params.s3_file_name_pattern,
                "no object key matches the file name pattern"
            );
        }

        info!("creating or updating the s3 bucket asset");
        let bucket = S3BucketAsset {
            name: params.s3_bucket_name.clone(),
            connection_qualified_name: params.s3_connection_qualified_name.clone(),
            aws_arn: format!("{}-{}", params.s3_bucket_arn, params.qualifier_suffix),
            object_count: objects.len(),
            owners: params.asset_owners.clone(),
        };
        let mut upserted = UpsertedAssets {
            s3_bucket_guid: self.gateway.upsert(&bucket).await?,
            ..Default::default()
        };

        info!("creating or updating s3 assets and their lineage");
        for object in &objects {
            self.sync_object(params, &bucket, object, &mut upserted)
                .await?;
        }

        info!(
            objects = upserted.s3_objects_guids.len(),
            processes = upserted.processes_guids.len(),
            "s3 assets and lineage synchronised"
        );
        Ok(upserted)
    }

    /// Upsert one object and its lineage in both directions
    async fn sync_object(
        &self,
        params: &UpsertS3AssetsAndLineageParams,
        bucket: &S3BucketAsset,
        object: &ResolvedObject,
        upserted: &mut UpsertedAssets,
    ) -> LineageResult<()> {
        info!(key = %object.key, "creating or updating s3 object asset");
        let asset = S3ObjectAsset {
            key: object.key.clone(),
            connection_qualified_name: params.s3_connection_qualified_name.clone(),
            bucket_name: bucket.name.clone(),
            bucket_qualified_name: bucket.qualified_name(),
            bucket_aws_arn: bucket.aws_arn.clone(),
            owners: params.asset_owners.clone(),
        };
        upserted
            .s3_objects_guids
            .push(self.gateway.upsert(&asset).await?);

        let object_ref =
            AssetRef::by_qualified_name(AssetType::S3Object.type_name(), asset.qualified_name());

        for direction in [
            LineageDirection::SourceToObject,
            LineageDirection::ObjectToTarget,
        ] {
            if let Some(guid) = self
                .link(params, direction, &object.table_name, &object_ref)
                .await?
            {
                upserted.processes_guids.push(guid);
            }
        }

        Ok(())
    }

    /// Create the lineage process for one direction, if any table matches
    async fn link(
        &self,
        params: &UpsertS3AssetsAndLineageParams,
        direction: LineageDirection,
        table_name: &str,
        object_ref: &AssetRef,
    ) -> LineageResult<Option<String>> {
        let (schema, table_pattern, connection, name_suffix, id_suffix) = match direction {
            LineageDirection::SourceToObject => (
                &params.source_database_schema_qualified_name,
                params.source_table_pattern.as_deref(),
                &params.source_connection_qualified_name,
                &params.source_extraction_process_name_suffix,
                &params.source_extraction_process_id_suffix,
            ),
            LineageDirection::ObjectToTarget => (
                &params.target_database_schema_qualified_name,
                params.target_table_pattern.as_deref(),
                &params.target_connection_qualified_name,
                &params.target_import_process_name_suffix,
                &params.target_import_process_id_suffix,
            ),
        };

        let search_term = apply_table_pattern(table_pattern, table_name);
        let tables = self
            .gateway
            .search_tables_in_schema(schema, &search_term)
            .await?;
        if tables.is_empty() {
            debug!(table_name, ?direction, "no matching tables, skipping lineage");
            return Ok(None);
        }

        let table_refs: Vec<AssetRef> = tables.iter().map(Entity::to_ref).collect();
        let (inputs, outputs) = match direction {
            LineageDirection::SourceToObject => (table_refs, vec![object_ref.clone()]),
            LineageDirection::ObjectToTarget => (vec![object_ref.clone()], table_refs),
        };

        info!(table_name, ?direction, "creating or updating lineage");
        let process = ProcessAsset {
            name: format!("{} {}", table_name, name_suffix),
            process_id: format!(
                "{}{}{}",
                table_name,
                direction.process_id_separator(),
                id_suffix
            ),
            connection_qualified_name: connection.clone(),
            inputs,
            outputs,
            owners: params.asset_owners.clone(),
        };
        Ok(Some(self.gateway.upsert(&process).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_id_separators() {
        assert_eq!(LineageDirection::SourceToObject.process_id_separator(), "_");
        assert_eq!(LineageDirection::ObjectToTarget.process_id_separator(), " ");
    }
}
