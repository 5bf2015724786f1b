use std::sync::Arc;

use crate::application::ports::{HistoryError, HistoryStore};
use crate::presentation::config::{HistoryProviderSetting, HistorySettings};

use super::super::pg_pool::create_pool;
use super::{DisabledHistoryStore, InMemoryHistoryStore, PgHistoryStore};

pub struct HistoryStoreFactory;

impl HistoryStoreFactory {
    /// Postgres without a `database_url` degrades to a disabled store.
    pub async fn create(settings: &HistorySettings) -> Result<Arc<dyn HistoryStore>, HistoryError> {
        match settings.provider {
            HistoryProviderSetting::Disabled => Ok(Arc::new(DisabledHistoryStore)),
            HistoryProviderSetting::Memory => Ok(Arc::new(InMemoryHistoryStore::new())),
            HistoryProviderSetting::Postgres => {
                let Some(url) = settings
                    .database_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                else {
                    tracing::warn!("No database_url configured, history disabled");
                    return Ok(Arc::new(DisabledHistoryStore));
                };

                let pool = create_pool(url, settings.max_connections).await?;
                let store = PgHistoryStore::new(pool);
                if settings.run_migrations {
                    store.run_migrations().await?;
                    tracing::info!("History migrations applied");
                }
                Ok(Arc::new(store))
            }
        }
    }
}
