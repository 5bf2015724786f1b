use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::signer::Signer;

use crate::application::ports::{StorageError, VideoStore};
use crate::domain::StorageKey;
use crate::infrastructure::observability::redact_url;

use super::transfer;

pub struct S3VideoStore {
    inner: Arc<AmazonS3>,
}

impl S3VideoStore {
    pub fn new(
        bucket: &str,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        endpoint: Option<&str>,
    ) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(region)
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key);
        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
        })
    }

    async fn sign(&self, method: Method, key: &StorageKey, expires_in: Duration) -> Result<String, StorageError> {
        let url = self
            .inner
            .signed_url(method, &transfer::location(key), expires_in)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?
            .to_string();
        tracing::debug!(url = %redact_url(&url), "Presigned URL issued");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl VideoStore for S3VideoStore {
    async fn download(&self, key: &StorageKey, destination: &Path) -> Result<u64, StorageError> {
        transfer::download_to_file(self.inner.as_ref(), key, destination).await
    }

    async fn upload(&self, source: &Path, key: &StorageKey) -> Result<u64, StorageError> {
        transfer::upload_from_file(self.inner.as_ref(), source, key).await
    }

    async fn presign_download(&self, key: &StorageKey, expires_in: Duration) -> Result<String, StorageError> {
        self.sign(Method::GET, key, expires_in).await
    }

    /// The signature does not bind a content type.
    async fn presign_upload(
        &self,
        key: &StorageKey,
        _content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        self.sign(Method::PUT, key, expires_in).await
    }
}
