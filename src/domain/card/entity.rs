//! Social card entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::Slug;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// Card identifier (UUID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Generate a fresh random CardId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for CardId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for Card {
    type Key = CardId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Card rendering format, mirrored from the Twitter card vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Square 1:1 thumbnail card
    Summary,
    /// Large ~1.91:1 hero image card
    #[default]
    SummaryLargeImage,
}

impl CardType {
    /// Processed image dimensions (width, height) for this card type
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Summary => (144, 144),
            Self::SummaryLargeImage => (1200, 628),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "summary" => Some(Self::Summary),
            "summary_large_image" => Some(Self::SummaryLargeImage),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Social card entity: a destination URL plus preview metadata and the
/// storage keys of its uploaded and processed images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for the card
    id: CardId,
    /// Owning user
    user_id: UserId,
    /// Public slug used in share links
    slug: Slug,
    /// Preview title
    title: String,
    /// Preview description
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Where human visitors are redirected
    destination_url: String,
    /// Rendering format
    card_type: CardType,
    /// Media key of the uploaded original
    image_original_key: String,
    /// Media key of the processed PNG
    image_processed_key: String,
    /// Non-crawler visit count
    view_count: u64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CardId,
        user_id: UserId,
        slug: Slug,
        title: impl Into<String>,
        description: Option<String>,
        destination_url: impl Into<String>,
        card_type: CardType,
        image_original_key: impl Into<String>,
        image_processed_key: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            user_id,
            slug,
            title: title.into(),
            description,
            destination_url: destination_url.into(),
            card_type,
            image_original_key: image_original_key.into(),
            image_processed_key: image_processed_key.into(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn destination_url(&self) -> &str {
        &self.destination_url
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn image_original_key(&self) -> &str {
        &self.image_original_key
    }

    pub fn image_processed_key(&self) -> &str {
        &self.image_processed_key
    }

    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators. The image keys are immutable: changing the image means
    // creating a new card.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn set_destination_url(&mut self, url: impl Into<String>) {
        self.destination_url = url.into();
        self.touch();
    }

    /// Count a non-crawler visit
    pub fn record_view(&mut self) {
        self.view_count += 1;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_card(title: &str) -> Card {
        Card::new(
            CardId::generate(),
            UserId::generate(),
            Slug::generate(),
            title,
            Some("A description".to_string()),
            "https://example.com",
            CardType::SummaryLargeImage,
            "originals/u/s.original",
            "processed/s.png",
        )
    }

    #[test]
    fn test_card_type_dimensions() {
        assert_eq!(CardType::Summary.dimensions(), (144, 144));
        assert_eq!(CardType::SummaryLargeImage.dimensions(), (1200, 628));
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!(CardType::parse("summary"), Some(CardType::Summary));
        assert_eq!(
            CardType::parse("summary_large_image"),
            Some(CardType::SummaryLargeImage)
        );
        assert_eq!(CardType::parse("player"), None);
    }

    #[test]
    fn test_new_card() {
        let card = create_test_card("Launch post");

        assert_eq!(card.title(), "Launch post");
        assert_eq!(card.view_count(), 0);
        assert_eq!(card.card_type(), CardType::SummaryLargeImage);
    }

    #[test]
    fn test_record_view() {
        let mut card = create_test_card("Launch post");

        card.record_view();
        card.record_view();
        assert_eq!(card.view_count(), 2);
    }

    #[test]
    fn test_metadata_updates() {
        let mut card = create_test_card("Launch post");

        card.set_title("Renamed");
        card.set_description(None);
        card.set_destination_url("https://other.example.com");

        assert_eq!(card.title(), "Renamed");
        assert!(card.description().is_none());
        assert_eq!(card.destination_url(), "https://other.example.com");
        // Image keys untouched
        assert_eq!(card.image_processed_key(), "processed/s.png");
    }
}
