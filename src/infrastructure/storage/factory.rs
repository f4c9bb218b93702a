//! Storage factory for runtime backend selection

use std::sync::Arc;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a storage instance for one entity type based on the
    /// database configuration
    pub async fn create<E>(
        config: &DatabaseConfig,
        table_name: &str,
    ) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config.backend {
            DatabaseBackend::Memory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            DatabaseBackend::Postgres => {
                let pg_config = PostgresConfig::from(config);
                let storage = PostgresStorage::<E>::connect(&pg_config, table_name).await?;
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }

    /// Creates an in-memory storage
    pub fn create_in_memory<E>() -> Arc<InMemoryStorage<E>>
    where
        E: StorageEntity,
    {
        Arc::new(InMemoryStorage::new())
    }
}
