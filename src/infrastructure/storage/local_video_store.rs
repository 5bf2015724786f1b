use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use object_store::local::LocalFileSystem;

use crate::application::ports::{StorageError, VideoStore};
use crate::domain::StorageKey;

use super::transfer;

/// Filesystem-backed store for development. Links point at a static file
/// server and never expire.
pub struct LocalVideoStore {
    inner: Arc<LocalFileSystem>,
    public_base_url: String,
}

impl LocalVideoStore {
    pub fn new(base_path: PathBuf, public_base_url: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&base_path).map_err(StorageError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn link(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait::async_trait]
impl VideoStore for LocalVideoStore {
    async fn download(&self, key: &StorageKey, destination: &Path) -> Result<u64, StorageError> {
        transfer::download_to_file(self.inner.as_ref(), key, destination).await
    }

    async fn upload(&self, source: &Path, key: &StorageKey) -> Result<u64, StorageError> {
        transfer::upload_from_file(self.inner.as_ref(), source, key).await
    }

    async fn presign_download(&self, key: &StorageKey, _expires_in: Duration) -> Result<String, StorageError> {
        Ok(self.link(key))
    }

    async fn presign_upload(
        &self,
        key: &StorageKey,
        _content_type: &str,
        _expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(self.link(key))
    }
}
