//! S3 object listing through the AWS SDK
//!
//! Credentials and region come from the ambient AWS environment (environment
//! variables, profile, instance/task role); only the region and endpoint can be
//! overridden from [`StorageSection`](crate::config::StorageSection).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use tracing::debug;

use super::{ObjectLister, StorageError, StorageResult};
use crate::config::StorageSection;

/// [`ObjectLister`] backed by `ListObjectsV2`
#[derive(Debug, Clone)]
pub struct S3ObjectLister {
    client: Client,
}

impl S3ObjectLister {
    /// Wrap an existing S3 client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration plus overrides
    pub async fn from_config(config: &StorageSection) -> StorageResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        if sdk_config.region().is_none() {
            return Err(StorageError::ClientError(
                "no AWS region configured; set AWS_REGION or storage.region".to_string(),
            ));
        }

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::new(Client::from_conf(s3_config)))
    }
}

#[async_trait]
impl ObjectLister for S3ObjectLister {
    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_prefix(prefix.map(str::to_string))
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    if e.as_service_error().is_some_and(|se| se.is_no_such_bucket()) {
                        StorageError::BucketNotFound(bucket.to_string())
                    } else {
                        StorageError::ListFailed {
                            bucket: bucket.to_string(),
                            reason: DisplayErrorContext(&e).to_string(),
                        }
                    }
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            bucket,
            prefix = prefix.unwrap_or_default(),
            count = keys.len(),
            "listed bucket objects"
        );
        Ok(keys)
    }
}
