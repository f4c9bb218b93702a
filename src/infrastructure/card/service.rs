//! Card service
//!
//! The full card lifecycle: quota gate, image validation and
//! processing, media upload, record CRUD, and view counting.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::domain::card::{
    validate_description, validate_destination_url, validate_title, Card, CardId, CardRepository,
    CardSearch, CardType, Slug,
};
use crate::domain::media::{original_key, processed_key, MediaStore};
use crate::domain::page::{PagedResult, PageRequest};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::image::ImageProcessor;
use crate::infrastructure::user::UserService;

/// An uploaded image, as received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
    pub content_type: String,
}

/// Input for creating a card
#[derive(Debug)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub destination_url: String,
    pub card_type: CardType,
    pub image: ImageUpload,
}

/// Input for updating a card's metadata. The image is immutable.
///
/// `description` distinguishes "leave unchanged" (None) from "clear"
/// (Some(None)).
#[derive(Debug, Default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub destination_url: Option<String>,
}

/// Card service
#[derive(Debug)]
pub struct CardService {
    repository: Arc<dyn CardRepository>,
    users: Arc<UserService>,
    media: Arc<dyn MediaStore>,
    processor: ImageProcessor,
}

impl CardService {
    pub fn new(
        repository: Arc<dyn CardRepository>,
        users: Arc<UserService>,
        media: Arc<dyn MediaStore>,
        processor: ImageProcessor,
    ) -> Self {
        Self {
            repository,
            users,
            media,
            processor,
        }
    }

    pub fn media(&self) -> &Arc<dyn MediaStore> {
        &self.media
    }

    /// Create a card: quota check, image pipeline, upload, record.
    pub async fn create(&self, user_id: &UserId, input: NewCard) -> Result<Card, DomainError> {
        self.users.ensure_can_create_card(user_id).await?;

        let title =
            validate_title(&input.title).map_err(|e| DomainError::validation(e.to_string()))?;
        let description = validate_description(input.description.as_deref())
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let destination_url = validate_destination_url(&input.destination_url)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.processor
            .validate(&input.image.data, &input.image.content_type)?;
        let processed = self
            .processor
            .process(&input.image.data, input.card_type)?;

        let slug = Slug::generate();
        let original = original_key(user_id.as_str(), slug.as_str());
        let processed_path = processed_key(slug.as_str());

        self.media
            .put(&original, input.image.data.clone(), &input.image.content_type)
            .await?;
        self.media
            .put(&processed_path, Bytes::from(processed), "image/png")
            .await?;

        let card = Card::new(
            CardId::generate(),
            user_id.clone(),
            slug,
            title,
            description,
            destination_url,
            input.card_type,
            original,
            processed_path,
        );

        let card = self.repository.create(card).await?;
        self.users.record_card_created(user_id).await?;

        info!(card_id = %card.id(), slug = %card.slug(), user_id = %user_id, "Card created");
        Ok(card)
    }

    /// Get a card owned by the given user
    pub async fn get_owned(
        &self,
        user_id: &UserId,
        id: &CardId,
    ) -> Result<Option<Card>, DomainError> {
        Ok(self
            .repository
            .get(id)
            .await?
            .filter(|c| c.user_id() == user_id))
    }

    /// Get a card by its public slug
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Card>, DomainError> {
        self.repository.get_by_slug(slug).await
    }

    /// Page through a user's cards, newest first
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError> {
        self.repository.list_for_user(user_id, page).await
    }

    /// Page through all cards matching an admin search
    pub async fn search(
        &self,
        filter: &CardSearch,
        page: PageRequest,
    ) -> Result<PagedResult<Card>, DomainError> {
        self.repository.search(filter, page).await
    }

    /// Update metadata on a card owned by the given user
    pub async fn update(
        &self,
        user_id: &UserId,
        id: &CardId,
        update: CardUpdate,
    ) -> Result<Card, DomainError> {
        let mut card = self
            .get_owned(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Card '{}' not found", id)))?;

        if let Some(title) = &update.title {
            let title =
                validate_title(title).map_err(|e| DomainError::validation(e.to_string()))?;
            card.set_title(title);
        }

        if let Some(description) = &update.description {
            let description = validate_description(description.as_deref())
                .map_err(|e| DomainError::validation(e.to_string()))?;
            card.set_description(description);
        }

        if let Some(url) = &update.destination_url {
            let url = validate_destination_url(url)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            card.set_destination_url(url);
        }

        self.repository.update(&card).await
    }

    /// Delete a card owned by the given user
    pub async fn delete(&self, user_id: &UserId, id: &CardId) -> Result<(), DomainError> {
        let card = self
            .get_owned(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Card '{}' not found", id)))?;

        self.delete_card(card).await
    }

    /// Delete any card regardless of owner (admin surface)
    pub async fn delete_any(&self, id: &CardId) -> Result<(), DomainError> {
        let card = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Card '{}' not found", id)))?;

        self.delete_card(card).await
    }

    async fn delete_card(&self, card: Card) -> Result<(), DomainError> {
        // Media cleanup is best-effort; a dangling blob is preferable
        // to a card that cannot be deleted.
        if let Err(e) = self.media.delete(card.image_original_key()).await {
            warn!(card_id = %card.id(), "Failed to delete original image: {}", e);
        }
        if let Err(e) = self.media.delete(card.image_processed_key()).await {
            warn!(card_id = %card.id(), "Failed to delete processed image: {}", e);
        }

        self.repository.delete(card.id()).await?;
        info!(card_id = %card.id(), "Card deleted");

        Ok(())
    }

    /// Count a non-crawler visit
    pub async fn record_view(&self, id: &CardId) -> Result<(), DomainError> {
        self.repository.record_view(id).await
    }

    /// Card count for one user
    pub async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.repository.count_for_user(user_id).await
    }

    /// Total views across one user's cards
    pub async fn total_views_for_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        self.repository.total_views_for_user(user_id).await
    }

    /// Total card count (admin stats)
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Total views across all cards (admin stats)
    pub async fn total_views(&self) -> Result<u64, DomainError> {
        self.repository.total_views().await
    }
}
