//! Storage infrastructure - in-memory and PostgreSQL backends

mod factory;
mod in_memory;
mod postgres;

pub use factory::StorageFactory;
pub use in_memory::InMemoryStorage;
pub use postgres::{create_pool, PostgresConfig, PostgresStorage};
