//! Storage-backed OAuth account repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::oauth::{OAuthAccount, OAuthAccountId, OAuthAccountRepository, OAuthProvider};
use crate::domain::storage::Storage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage-backed implementation of OAuthAccountRepository
#[derive(Debug)]
pub struct StorageOAuthAccountRepository {
    storage: Arc<dyn Storage<OAuthAccount>>,
}

impl StorageOAuthAccountRepository {
    pub fn new(storage: Arc<dyn Storage<OAuthAccount>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl OAuthAccountRepository for StorageOAuthAccountRepository {
    async fn get(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<OAuthAccount>, DomainError> {
        let id = OAuthAccountId::new(provider, provider_user_id);
        self.storage.get(&id).await
    }

    async fn create(&self, account: OAuthAccount) -> Result<OAuthAccount, DomainError> {
        self.storage.create(account).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<OAuthAccount>, DomainError> {
        let all = self.storage.list().await?;
        Ok(all
            .into_iter()
            .filter(|a| a.user_id() == user_id)
            .collect())
    }

    async fn delete(&self, id: &OAuthAccountId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    #[tokio::test]
    async fn test_lookup_by_provider_identity() {
        let repo = StorageOAuthAccountRepository::new(Arc::new(
            InMemoryStorage::<OAuthAccount>::new(),
        ));
        let user_id = UserId::generate();

        repo.create(OAuthAccount::new(
            OAuthProvider::Google,
            "108123",
            user_id.clone(),
        ))
        .await
        .unwrap();

        let found = repo.get(OAuthProvider::Google, "108123").await.unwrap();
        assert_eq!(found.unwrap().user_id(), &user_id);

        assert!(repo.get(OAuthProvider::Google, "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_link_conflicts() {
        let repo = StorageOAuthAccountRepository::new(Arc::new(
            InMemoryStorage::<OAuthAccount>::new(),
        ));

        repo.create(OAuthAccount::new(
            OAuthProvider::Google,
            "108123",
            UserId::generate(),
        ))
        .await
        .unwrap();

        let result = repo
            .create(OAuthAccount::new(
                OAuthProvider::Google,
                "108123",
                UserId::generate(),
            ))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
