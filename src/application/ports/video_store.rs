use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::StorageKey;

/// Object storage holding uploads, rendered outputs and caption files.
#[async_trait]
pub trait VideoStore: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    /// Streams the object at `key` into `destination`, returning bytes written.
    async fn download(&self, key: &StorageKey, destination: &Path) -> Result<u64, StorageError>;

    /// Pushes the local file at `source` to `key`, returning bytes sent.
    async fn upload(&self, source: &Path, key: &StorageKey) -> Result<u64, StorageError>;

    async fn presign_download(
        &self,
        key: &StorageKey,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    async fn presign_upload(
        &self,
        key: &StorageKey,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object storage is not configured")]
    NotConfigured,
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("presign failed: {0}")]
    PresignFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
