//! Storage-backed user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::page::{paginate, PagedResult, PageRequest};
use crate::domain::storage::Storage;
use crate::domain::user::{Tier, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Storage-backed implementation of UserRepository.
///
/// Secondary lookups (email, token) scan the entity set; the backing
/// stores hold every entity as an opaque document.
#[derive(Debug)]
pub struct StorageUserRepository {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserRepository {
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserRepository for StorageUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.into_iter().find(|u| u.email() == email))
    }

    async fn get_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, DomainError> {
        let all = self.storage.list().await?;
        Ok(all
            .into_iter()
            .find(|u| u.verification_token() == Some(token)))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        if self.get_by_email(user.email()).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        self.storage.create(user).await
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        self.storage.update(user.clone()).await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn search(
        &self,
        email_query: Option<&str>,
        page: PageRequest,
    ) -> Result<PagedResult<User>, DomainError> {
        let query = email_query.map(str::to_lowercase);

        let mut users: Vec<User> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|u| match &query {
                Some(q) => u.email().contains(q),
                None => true,
            })
            .collect();
        users.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(paginate(users, page))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn count_verified(&self) -> Result<usize, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.iter().filter(|u| u.email_verified()).count())
    }

    async fn count_by_tier(&self) -> Result<HashMap<Tier, usize>, DomainError> {
        let mut counts = HashMap::new();
        for user in self.storage.list().await? {
            *counts.entry(user.tier()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_repo() -> StorageUserRepository {
        StorageUserRepository::new(Arc::new(InMemoryStorage::<User>::new()))
    }

    fn user(email: &str) -> User {
        User::new(UserId::generate(), email)
    }

    #[tokio::test]
    async fn test_create_and_get_by_email() {
        let repo = create_repo();

        repo.create(user("a@example.com")).await.unwrap();

        let found = repo.get_by_email("a@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = create_repo();

        repo.create(user("a@example.com")).await.unwrap();
        let result = repo.create(user("a@example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_get_by_verification_token() {
        let repo = create_repo();
        let u = user("a@example.com").with_verification_token("tok-123");

        repo.create(u).await.unwrap();

        let found = repo.get_by_verification_token("tok-123").await.unwrap();
        assert!(found.is_some());
        assert!(repo
            .get_by_verification_token("other")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_by_email_substring() {
        let repo = create_repo();

        repo.create(user("alice@example.com")).await.unwrap();
        repo.create(user("bob@example.com")).await.unwrap();
        repo.create(user("alice@other.org")).await.unwrap();

        let page = PageRequest::new(1, 50, 100);
        let result = repo.search(Some("alice"), page).await.unwrap();
        assert_eq!(result.total, 2);

        let all = repo.search(None, page).await.unwrap();
        assert_eq!(all.total, 3);
    }

    #[tokio::test]
    async fn test_count_by_tier() {
        let repo = create_repo();

        let mut premium = user("p@example.com");
        premium.set_tier(Tier::Premium);

        repo.create(user("f1@example.com")).await.unwrap();
        repo.create(user("f2@example.com")).await.unwrap();
        repo.create(premium).await.unwrap();

        let counts = repo.count_by_tier().await.unwrap();
        assert_eq!(counts.get(&Tier::Free), Some(&2));
        assert_eq!(counts.get(&Tier::Premium), Some(&1));
    }
}
