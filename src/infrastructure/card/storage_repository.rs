//! Storage-backed card repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::card::{Card, CardId, CardRepository, CardSearch, Slug};
use crate::domain::page::{paginate, PagedResult, PageRequest};
use crate::domain::storage::Storage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage-backed implementation of CardRepository
#[derive(Debug)]
pub struct StorageCardRepository {
    storage: Arc<dyn Storage<Card>>,
}

impl StorageCardRepository {
    pub fn new(storage: Arc<dyn Storage<Card>>) -> Self {
        Self { storage }
    }

    async fn sorted_filtered(
        &self,
        filter: impl Fn(&Card) -> bool,
    ) -> Result<Vec<Card>, DomainError> {
        let mut cards: Vec<Card> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|c| filter(c))
            .collect();
        cards.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(cards)
    }
}

#[async_trait]
impl CardRepository for StorageCardRepository {
    async fn get(&self, id: &CardId) -> Result<Option<Card>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Card>, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.into_iter().find(|c| c.slug() == slug))
    }

    async fn create(&self, card: Card) -> Result<Card, DomainError> {
        if self.get_by_slug(card.slug()).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Slug '{}' is already taken",
                card.slug()
            )));
        }

        self.storage.create(card).await
    }

    async fn update(&self, card: &Card) -> Result<Card, DomainError> {
        self.storage.update(card.clone()).await
    }

    async fn delete(&self, id: &CardId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError> {
        let cards = self.sorted_filtered(|c| c.user_id() == user_id).await?;
        Ok(paginate(cards, page))
    }

    async fn search(
        &self,
        filter: &CardSearch,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError> {
        let cards = self.sorted_filtered(|c| filter.matches(c)).await?;
        Ok(paginate(cards, page))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.iter().filter(|c| c.user_id() == user_id).count())
    }

    async fn total_views(&self) -> Result<u64, DomainError> {
        let all = self.storage.list().await?;
        Ok(all.iter().map(|c| c.view_count()).sum())
    }

    async fn total_views_for_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let all = self.storage.list().await?;
        Ok(all
            .iter()
            .filter(|c| c.user_id() == user_id)
            .map(|c| c.view_count())
            .sum())
    }

    async fn record_view(&self, id: &CardId) -> Result<(), DomainError> {
        let mut card = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Card '{}' not found", id)))?;

        card.record_view();
        self.storage.update(card).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::CardType;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_repo() -> StorageCardRepository {
        StorageCardRepository::new(Arc::new(InMemoryStorage::<Card>::new()))
    }

    fn card_for(user_id: &UserId, title: &str) -> Card {
        let slug = Slug::generate();
        Card::new(
            CardId::generate(),
            user_id.clone(),
            slug.clone(),
            title,
            None,
            "https://example.com",
            CardType::SummaryLargeImage,
            format!("originals/{}/{}.original", user_id, slug),
            format!("processed/{}.png", slug),
        )
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let repo = create_repo();
        let user_id = UserId::generate();
        let card = card_for(&user_id, "Hello");
        let slug = card.slug().clone();

        repo.create(card).await.unwrap();

        let found = repo.get_by_slug(&slug).await.unwrap();
        assert_eq!(found.unwrap().title(), "Hello");
        assert!(repo
            .get_by_slug(&Slug::new("missing-slug"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_scoped() {
        let repo = create_repo();
        let alice = UserId::generate();
        let bob = UserId::generate();

        repo.create(card_for(&alice, "A1")).await.unwrap();
        repo.create(card_for(&alice, "A2")).await.unwrap();
        repo.create(card_for(&bob, "B1")).await.unwrap();

        let page = PageRequest::new(1, 20, 100);
        let result = repo.list_for_user(&alice, page).await.unwrap();

        assert_eq!(result.total, 2);
        assert!(result.items.iter().all(|c| c.user_id() == &alice));
    }

    #[tokio::test]
    async fn test_record_view() {
        let repo = create_repo();
        let user_id = UserId::generate();
        let card = card_for(&user_id, "Views");
        let id = card.id().clone();

        repo.create(card).await.unwrap();
        repo.record_view(&id).await.unwrap();
        repo.record_view(&id).await.unwrap();

        assert_eq!(repo.get(&id).await.unwrap().unwrap().view_count(), 2);
        assert_eq!(repo.total_views_for_user(&user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_owner() {
        let repo = create_repo();
        let alice = UserId::generate();
        let bob = UserId::generate();

        repo.create(card_for(&alice, "Launch day")).await.unwrap();
        repo.create(card_for(&bob, "Quarterly report")).await.unwrap();

        let page = PageRequest::new(1, 50, 100);

        let by_title = CardSearch {
            text: Some("launch".to_string()),
            owner_ids: vec![],
        };
        assert_eq!(repo.search(&by_title, page).await.unwrap().total, 1);

        let by_owner = CardSearch {
            text: Some("nomatch".to_string()),
            owner_ids: vec![bob.clone()],
        };
        assert_eq!(repo.search(&by_owner, page).await.unwrap().total, 1);

        let all = CardSearch::default();
        assert_eq!(repo.search(&all, page).await.unwrap().total, 2);
    }
}
