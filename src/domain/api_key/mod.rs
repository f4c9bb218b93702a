//! API key domain - bearer credentials for the programmatic API

mod entity;
mod repository;

pub use entity::{ApiKey, ApiKeyId, MAX_KEY_NAME_LEN};
pub use repository::ApiKeyRepository;

#[cfg(test)]
pub use repository::mock;
