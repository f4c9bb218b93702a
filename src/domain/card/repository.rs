//! Card repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Card, CardId};
use super::slug::Slug;
use crate::domain::page::{PagedResult, PageRequest};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Admin card search: a card matches when the text matches its title or
/// slug, or its owner is one of `owner_ids` (owners resolved from an
/// email search). An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct CardSearch {
    pub text: Option<String>,
    pub owner_ids: Vec<UserId>,
}

impl CardSearch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.owner_ids.is_empty()
    }

    /// Whether a card matches this filter
    pub fn matches(&self, card: &Card) -> bool {
        if self.is_empty() {
            return true;
        }

        if let Some(text) = &self.text {
            let text = text.to_lowercase();
            if card.title().to_lowercase().contains(&text)
                || card.slug().as_str().to_lowercase().contains(&text)
            {
                return true;
            }
        }

        self.owner_ids.iter().any(|id| id == card.user_id())
    }
}

/// Repository trait for card storage
#[async_trait]
pub trait CardRepository: Send + Sync + Debug {
    /// Get a card by ID
    async fn get(&self, id: &CardId) -> Result<Option<Card>, DomainError>;

    /// Get a card by its public slug
    async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Card>, DomainError>;

    /// Create a new card
    async fn create(&self, card: Card) -> Result<Card, DomainError>;

    /// Update an existing card
    async fn update(&self, card: &Card) -> Result<Card, DomainError>;

    /// Delete a card, returns true if deleted
    async fn delete(&self, id: &CardId) -> Result<bool, DomainError>;

    /// Page through a user's cards, newest first
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError>;

    /// Page through all cards matching a search filter, newest first
    async fn search(
        &self,
        filter: &CardSearch,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError>;

    /// Total card count
    async fn count(&self) -> Result<usize, DomainError>;

    /// Card count for one user
    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;

    /// Sum of view counts across all cards
    async fn total_views(&self) -> Result<u64, DomainError>;

    /// Sum of view counts across one user's cards
    async fn total_views_for_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Count a non-crawler visit against a card
    async fn record_view(&self, id: &CardId) -> Result<(), DomainError>;
}
