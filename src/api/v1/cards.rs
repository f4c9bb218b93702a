//! Card endpoints for the programmatic API
//!
//! The handler cores are shared with the dashboard surface, which
//! exposes the same operations under session authentication.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PageQuery, PaginationMeta};
use crate::domain::card::{Card, CardId, CardType};
use crate::domain::user::UserId;
use crate::infrastructure::card::{CardUpdate, ImageUpload, NewCard};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

/// Card response shared by every authenticated surface
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: String,
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub destination_url: String,
    pub card_type: String,
    pub image_url: String,
    pub view_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl CardResponse {
    pub fn from_card(state: &AppState, card: &Card) -> Self {
        Self {
            id: card.id().as_str().to_string(),
            slug: card.slug().as_str().to_string(),
            url: state.card_url(card.slug().as_str()),
            title: card.title().to_string(),
            description: card.description().map(str::to_string),
            destination_url: card.destination_url().to_string(),
            card_type: card.card_type().to_string(),
            image_url: state.image_url(card.slug().as_str()),
            view_count: card.view_count(),
            created_at: card.created_at().to_rfc3339(),
            updated_at: card.updated_at().to_rfc3339(),
        }
    }
}

/// Paginated card list response
#[derive(Debug, Serialize)]
pub struct CardListResponse {
    pub cards: Vec<CardResponse>,
    pub pagination: PaginationMeta,
}

/// Card update request; a null description clears it
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub destination_url: Option<String>,
}

/// Distinguishes an absent field (None) from an explicit null
/// (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateCardRequest> for CardUpdate {
    fn from(request: UpdateCardRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            destination_url: request.destination_url,
        }
    }
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// Handler cores, shared with the dashboard surface

pub(crate) async fn list_cards_core(
    state: &AppState,
    user_id: &UserId,
    query: PageQuery,
) -> Result<CardListResponse, ApiError> {
    let page = query.resolve(DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let result = state.cards.list_for_user(user_id, page).await?;

    Ok(CardListResponse {
        pagination: PaginationMeta::from(&result),
        cards: result
            .items
            .iter()
            .map(|c| CardResponse::from_card(state, c))
            .collect(),
    })
}

pub(crate) async fn create_card_core(
    state: &AppState,
    user_id: &UserId,
    multipart: Multipart,
) -> Result<CardResponse, ApiError> {
    let input = parse_new_card(multipart).await?;
    let card = state.cards.create(user_id, input).await?;

    Ok(CardResponse::from_card(state, &card))
}

pub(crate) async fn get_card_core(
    state: &AppState,
    user_id: &UserId,
    card_id: &CardId,
) -> Result<CardResponse, ApiError> {
    let card = state
        .cards
        .get_owned(user_id, card_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;

    Ok(CardResponse::from_card(state, &card))
}

pub(crate) async fn update_card_core(
    state: &AppState,
    user_id: &UserId,
    card_id: &CardId,
    request: UpdateCardRequest,
) -> Result<CardResponse, ApiError> {
    let card = state
        .cards
        .update(user_id, card_id, request.into())
        .await?;

    Ok(CardResponse::from_card(state, &card))
}

pub(crate) async fn delete_card_core(
    state: &AppState,
    user_id: &UserId,
    card_id: &CardId,
) -> Result<MessageResponse, ApiError> {
    state.cards.delete(user_id, card_id).await?;

    Ok(MessageResponse {
        message: "Card deleted successfully".to_string(),
    })
}

/// Read a card-creation multipart form.
///
/// Fields: `image` (required), `title` (required), `destination_url`
/// (required), `description`, `card_type`.
pub(crate) async fn parse_new_card(mut multipart: Multipart) -> Result<NewCard, ApiError> {
    let mut image: Option<ImageUpload> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut destination_url: Option<String> = None;
    let mut card_type = CardType::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart form: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data: Bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read image field: {}", e))
                })?;

                if data.is_empty() {
                    return Err(ApiError::bad_request("Please provide a valid image file"));
                }

                image = Some(ImageUpload { data, content_type });
            }
            "title" => title = Some(read_text(field, "title").await?),
            "description" => description = Some(read_text(field, "description").await?),
            "destination_url" => destination_url = Some(read_text(field, "destination_url").await?),
            "card_type" => {
                let value = read_text(field, "card_type").await?;
                card_type = CardType::parse(&value).ok_or_else(|| {
                    ApiError::bad_request(
                        "card_type must be \"summary\" or \"summary_large_image\"",
                    )
                    .with_param("card_type")
                })?;
            }
            _ => {}
        }
    }

    Ok(NewCard {
        title: title
            .ok_or_else(|| ApiError::bad_request("Please provide a title").with_param("title"))?,
        description,
        destination_url: destination_url.ok_or_else(|| {
            ApiError::bad_request("Please provide a destination URL").with_param("destination_url")
        })?,
        card_type,
        image: image.ok_or_else(|| {
            ApiError::bad_request("Please provide an image file").with_param("image")
        })?,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read {} field: {}", name, e)))
}

// Handlers

/// List the authenticated user's cards
///
/// GET /v1/cards
pub async fn list_cards(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Query(query): Query<PageQuery>,
) -> Result<Json<CardListResponse>, ApiError> {
    Ok(Json(
        list_cards_core(&state, auth.user.id(), query).await?,
    ))
}

/// Create a new card (multipart/form-data)
///
/// POST /v1/cards
pub async fn create_card(
    State(state): State<AppState>,
    auth: RequireApiKey,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let response = create_card_core(&state, auth.user.id(), multipart).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a card by ID
///
/// GET /v1/cards/{card_id}
pub async fn get_card(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Path(card_id): Path<String>,
) -> Result<Json<CardResponse>, ApiError> {
    Ok(Json(
        get_card_core(&state, auth.user.id(), &CardId::new(card_id)).await?,
    ))
}

/// Update a card's metadata. The image is immutable: create a new card
/// to change it.
///
/// PATCH /v1/cards/{card_id}
pub async fn update_card(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Path(card_id): Path<String>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    Ok(Json(
        update_card_core(&state, auth.user.id(), &CardId::new(card_id), request).await?,
    ))
}

/// Delete a card
///
/// DELETE /v1/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Path(card_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        delete_card_core(&state, auth.user.id(), &CardId::new(card_id)).await?,
    ))
}
