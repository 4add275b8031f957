use std::collections::HashMap;

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;

use super::error::StorageError;
use super::traits::ObjectStore;

/// S3-backed object store.
///
/// Wraps a single bucket. All requests are authorized with static credentials
/// read once at startup; retrieval links are produced as pre-signed GET URLs
/// so clients never see those credentials.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    /// Connect to a bucket.
    ///
    /// `endpoint` overrides the AWS endpoint for S3-compatible stores (MinIO
    /// and friends), which also switches to path-style addressing.
    pub fn new(
        bucket_name: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        endpoint: Option<&str>,
    ) -> Result<Self, StorageError> {
        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_owned(),
                endpoint: endpoint.to_owned(),
            },
            None => region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        tracing::debug!(key, size = data.len(), "Putting object");
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        tracing::debug!(key, "Deleting object");
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        expiry_secs: u32,
        download_name: Option<&str>,
    ) -> Result<String, StorageError> {
        let custom_queries = download_name.map(|name| {
            let mut queries = HashMap::new();
            queries.insert(
                "response-content-disposition".to_owned(),
                format!("attachment; filename=\"{}\"", sanitize_filename(name)),
            );
            queries
        });

        self.bucket
            .presign_get(key, expiry_secs, custom_queries)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn location(&self, key: &str) -> Option<String> {
        Some(format!("{}/{}", self.bucket.url(), key))
    }
}

/// Strip characters that would break the quoted content-disposition value.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_ascii_control() && !matches!(c, '"' | '\\'))
        .collect()
}
