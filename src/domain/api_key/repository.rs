//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Get an API key by its unique prefix (authentication lookup)
    async fn get_by_prefix(&self, prefix: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// All keys belonging to a user, newest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError>;

    /// Count of non-revoked keys belonging to a user
    async fn count_active_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;

    /// Record usage of an API key
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock API key repository for testing
    #[derive(Debug, Default)]
    pub struct MockApiKeyRepository {
        keys: Arc<RwLock<HashMap<String, ApiKey>>>,
    }

    impl MockApiKeyRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ApiKeyRepository for MockApiKeyRepository {
        async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
            Ok(self.keys.read().await.get(id.as_str()).cloned())
        }

        async fn get_by_prefix(&self, prefix: &str) -> Result<Option<ApiKey>, DomainError> {
            Ok(self
                .keys
                .read()
                .await
                .values()
                .find(|k| k.key_prefix() == prefix)
                .cloned())
        }

        async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
            let mut keys = self.keys.write().await;
            let id = api_key.id().as_str().to_string();

            if keys.contains_key(&id) {
                return Err(DomainError::conflict(format!(
                    "API key '{}' already exists",
                    id
                )));
            }

            keys.insert(id, api_key.clone());
            Ok(api_key)
        }

        async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
            let mut keys = self.keys.write().await;
            let id = api_key.id().as_str().to_string();

            if !keys.contains_key(&id) {
                return Err(DomainError::not_found(format!(
                    "API key '{}' not found",
                    id
                )));
            }

            keys.insert(id, api_key.clone());
            Ok(api_key.clone())
        }

        async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
            Ok(self.keys.write().await.remove(id.as_str()).is_some())
        }

        async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
            let mut keys: Vec<ApiKey> = self
                .keys
                .read()
                .await
                .values()
                .filter(|k| k.user_id() == user_id)
                .cloned()
                .collect();
            keys.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            Ok(keys)
        }

        async fn count_active_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
            Ok(self
                .keys
                .read()
                .await
                .values()
                .filter(|k| k.user_id() == user_id && k.is_active())
                .count())
        }

        async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
            let mut keys = self.keys.write().await;
            let key = keys
                .get_mut(id.as_str())
                .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;
            key.record_usage();
            Ok(())
        }
    }
}
