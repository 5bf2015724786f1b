use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{StorageError, VideoStore};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::disabled_video_store::DisabledVideoStore;
use super::local_video_store::LocalVideoStore;
use super::s3_video_store::S3VideoStore;

pub struct VideoStoreFactory;

impl VideoStoreFactory {
    /// Missing S3 credentials yield a disabled store rather than an error.
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn VideoStore>, StorageError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let store = LocalVideoStore::new(
                    PathBuf::from(&settings.local_path),
                    &settings.public_base_url,
                )?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::S3 => {
                let credentials = (
                    non_empty(settings.bucket.as_deref()),
                    non_empty(settings.access_key_id.as_deref()),
                    non_empty(settings.secret_access_key.as_deref()),
                );
                let (Some(bucket), Some(key_id), Some(secret)) = credentials else {
                    tracing::warn!("S3 bucket or credentials missing, storage disabled");
                    return Ok(Arc::new(DisabledVideoStore));
                };

                let store = S3VideoStore::new(
                    bucket,
                    &settings.region,
                    key_id,
                    secret,
                    non_empty(settings.endpoint.as_deref()),
                )?;
                tracing::info!(bucket = %bucket, region = %settings.region, "S3 storage configured");
                Ok(Arc::new(store))
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
