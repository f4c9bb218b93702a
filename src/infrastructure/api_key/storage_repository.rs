//! Storage-backed API key repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::storage::Storage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage-backed implementation of ApiKeyRepository
#[derive(Debug)]
pub struct StorageApiKeyRepository {
    storage: Arc<dyn Storage<ApiKey>>,
}

impl StorageApiKeyRepository {
    pub fn new(storage: Arc<dyn Storage<ApiKey>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ApiKeyRepository for StorageApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Option<ApiKey>, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.into_iter().find(|k| k.key_prefix() == prefix))
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        self.storage.create(api_key).await
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        self.storage.update(api_key.clone()).await
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        let mut keys: Vec<ApiKey> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|k| k.user_id() == user_id)
            .collect();
        keys.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(keys)
    }

    async fn count_active_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let all = self.storage.list().await?;
        Ok(all
            .iter()
            .filter(|k| k.user_id() == user_id && k.is_active())
            .count())
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let mut key = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        key.record_usage();
        self.storage.update(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_repo() -> StorageApiKeyRepository {
        StorageApiKeyRepository::new(Arc::new(InMemoryStorage::<ApiKey>::new()))
    }

    fn key_for(user_id: &UserId, prefix: &str) -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            user_id.clone(),
            "Test key",
            "sha256$hash",
            prefix,
        )
    }

    #[tokio::test]
    async fn test_get_by_prefix() {
        let repo = create_repo();
        let user_id = UserId::generate();

        repo.create(key_for(&user_id, "ck_live_abc12345"))
            .await
            .unwrap();

        let found = repo.get_by_prefix("ck_live_abc12345").await.unwrap();
        assert!(found.is_some());
        assert!(repo.get_by_prefix("ck_live_zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_active_excludes_revoked() {
        let repo = create_repo();
        let user_id = UserId::generate();

        let mut revoked = key_for(&user_id, "ck_live_aaa11111");
        revoked.revoke();

        repo.create(revoked).await.unwrap();
        repo.create(key_for(&user_id, "ck_live_bbb22222"))
            .await
            .unwrap();

        assert_eq!(repo.count_active_for_user(&user_id).await.unwrap(), 1);
        assert_eq!(repo.list_for_user(&user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_record_usage() {
        let repo = create_repo();
        let user_id = UserId::generate();
        let key = key_for(&user_id, "ck_live_ccc33333");
        let id = key.id().clone();

        repo.create(key).await.unwrap();
        repo.record_usage(&id).await.unwrap();

        assert!(repo.get(&id).await.unwrap().unwrap().last_used_at().is_some());
    }
}
