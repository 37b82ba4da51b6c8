//! Object storage for uploaded images: S3-compatible buckets or an in-process map.

use crate::config::StorageSettings;
use crate::error::AppError;
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// S3 DeleteObjects accepts at most this many keys per call.
const DELETE_BATCH: usize = 1000;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Delete every key. Missing keys are not an error.
    async fn delete_many(&self, keys: &[String]) -> Result<(), AppError>;
}

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    pub async fn connect(bucket: &str, region: &str, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk = loader.load().await;
        let mut conf = aws_sdk_s3::config::Builder::from(&sdk);
        if endpoint.map(is_local_endpoint).unwrap_or(false) {
            conf = conf.force_path_style(true);
        }
        S3Storage {
            client: aws_sdk_s3::Client::from_conf(conf.build()),
            bucket: bucket.to_string(),
        }
    }
}

/// MinIO and friends on localhost do not resolve virtual-host bucket names.
fn is_local_endpoint(endpoint: &str) -> bool {
    endpoint.contains("localhost") || endpoint.contains("127.0.0.1")
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put {}: {}", key, e)))?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<(), AppError> {
        for chunk in keys.chunks(DELETE_BATCH) {
            let objects = chunk
                .iter()
                .map(|k| ObjectIdentifier::builder().key(k).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| AppError::Storage(e.to_string()))?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| AppError::Storage(e.to_string()))?;
            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| AppError::Storage(format!("delete {} objects: {}", chunk.len(), e)))?;
        }
        Ok(())
    }
}

/// Process-local store for development and tests.
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (content_type.to_string(), body));
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<(), AppError> {
        let mut objects = self.objects.write().await;
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }
}

/// S3 when a bucket is configured, otherwise the in-memory store.
pub async fn from_settings(settings: &StorageSettings) -> Arc<dyn ObjectStorage> {
    match (&settings.bucket, &settings.region) {
        (Some(bucket), Some(region)) => {
            tracing::info!(bucket = %bucket, region = %region, "using S3 object storage");
            Arc::new(S3Storage::connect(bucket, region, settings.endpoint.as_deref()).await)
        }
        _ => {
            tracing::warn!("S3_BUCKET not set; uploaded images are kept in memory only");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Delete objects whose rows are already gone. Failures leave orphans in the bucket and are only logged.
pub async fn delete_orphans(storage: &dyn ObjectStorage, keys: &[String]) {
    if keys.is_empty() {
        return;
    }
    if let Err(e) = storage.delete_many(keys).await {
        tracing::warn!(error = %e, keys = ?keys, "object cleanup failed; keys orphaned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_put_and_delete() {
        let store = MemoryStorage::new();
        store.put("1/a.jpeg", vec![1, 2, 3], "image/jpeg").await.unwrap();
        store.put("1/b.jpeg", vec![4], "image/jpeg").await.unwrap();
        assert!(store.contains("1/a.jpeg").await);
        store
            .delete_many(&["1/a.jpeg".to_string(), "1/missing.jpeg".to_string()])
            .await
            .unwrap();
        assert!(!store.contains("1/a.jpeg").await);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn local_endpoints_use_path_style() {
        assert!(is_local_endpoint("http://localhost:9000"));
        assert!(is_local_endpoint("http://127.0.0.1:9000"));
        assert!(!is_local_endpoint("https://acct.r2.cloudflarestorage.com"));
    }
}
