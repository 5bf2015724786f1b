mod disabled_history_store;
mod history_store_factory;
mod in_memory_history_store;
mod pg_history_store;

pub use disabled_history_store::DisabledHistoryStore;
pub use history_store_factory::HistoryStoreFactory;
pub use in_memory_history_store::InMemoryHistoryStore;
pub use pg_history_store::PgHistoryStore;
