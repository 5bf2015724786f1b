use std::path::Path;
use std::time::Duration;

use crate::application::ports::{StorageError, VideoStore};
use crate::domain::StorageKey;

/// Stand-in used when no storage credentials are configured.
pub struct DisabledVideoStore;

#[async_trait::async_trait]
impl VideoStore for DisabledVideoStore {
    fn is_configured(&self) -> bool {
        false
    }

    async fn download(&self, _key: &StorageKey, _destination: &Path) -> Result<u64, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn upload(&self, _source: &Path, _key: &StorageKey) -> Result<u64, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn presign_download(&self, _key: &StorageKey, _expires_in: Duration) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn presign_upload(
        &self,
        _key: &StorageKey,
        _content_type: &str,
        _expires_in: Duration,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }
}
