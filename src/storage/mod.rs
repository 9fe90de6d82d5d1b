//! Object storage listing
//!
//! The lineage workflow only needs one thing from object storage: the keys under a
//! prefix of a bucket, in listing order. [`ObjectLister`] is that seam; the S3
//! implementation lives in [`s3`] behind the `s3` feature.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "s3")]
pub use self::s3::S3ObjectLister;

/// Errors that can occur while listing objects
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to build the storage client
    #[error("Storage client error: {0}")]
    ClientError(String),

    /// Bucket does not exist or is not accessible
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Listing request failed
    #[error("Failed to list objects in bucket '{bucket}': {reason}")]
    ListFailed { bucket: String, reason: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Lists object keys in a bucket
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List every key under `prefix` (all keys when `None`), in listing order
    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<String>>;
}

#[async_trait]
impl<L: ObjectLister + ?Sized> ObjectLister for std::sync::Arc<L> {
    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<String>> {
        (**self).list_keys(bucket, prefix).await
    }
}
