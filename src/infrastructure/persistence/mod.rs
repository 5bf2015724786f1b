mod history;
mod job_registry;
mod pg_pool;

pub use history::{
    DisabledHistoryStore, HistoryStoreFactory, InMemoryHistoryStore, PgHistoryStore,
};
pub use job_registry::InMemoryJobRegistry;
pub use pg_pool::create_pool;
