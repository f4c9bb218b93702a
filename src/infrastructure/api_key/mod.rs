//! API key infrastructure - generation, persistence, lifecycle

mod generator;
mod service;
mod storage_repository;

pub use generator::{ApiKeyGenerator, GeneratedApiKey};
pub use service::{ApiKeyService, CreateApiKeyResult};
pub use storage_repository::StorageApiKeyRepository;
