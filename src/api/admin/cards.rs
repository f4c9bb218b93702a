//! Card management admin endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PageQuery, PaginationMeta};
use crate::api::v1::cards::CardResponse;
use crate::domain::card::{CardId, CardSearch};
use crate::domain::page::PageRequest;

const ADMIN_PER_PAGE: u32 = 50;
const MAX_PER_PAGE: u32 = 100;

/// Card plus owner identity for the admin surface
#[derive(Debug, Serialize)]
pub struct AdminCardResponse {
    #[serde(flatten)]
    pub card: CardResponse,
    pub user_id: String,
    pub owner_email: Option<String>,
}

/// Paginated card list
#[derive(Debug, Serialize)]
pub struct AdminCardListResponse {
    pub cards: Vec<AdminCardResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct CardSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// List all cards, optionally filtered by title, slug, or owner email
///
/// GET /admin/cards
pub async fn list_cards(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<CardSearchQuery>,
) -> Result<Json<AdminCardListResponse>, ApiError> {
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve(ADMIN_PER_PAGE, MAX_PER_PAGE);
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let filter = match search {
        Some(text) => {
            // Owner matching goes through an email search first
            let owners = state
                .users
                .repository()
                .search(Some(text), PageRequest::new(1, MAX_PER_PAGE, MAX_PER_PAGE))
                .await?;

            CardSearch {
                text: Some(text.to_string()),
                owner_ids: owners.items.iter().map(|u| u.id().clone()).collect(),
            }
        }
        None => CardSearch::default(),
    };

    let result = state.cards.search(&filter, page).await?;

    let owners = futures::future::join_all(
        result.items.iter().map(|card| state.users.get(card.user_id())),
    )
    .await;

    let cards = result
        .items
        .iter()
        .zip(owners)
        .map(|(card, owner)| AdminCardResponse {
            card: CardResponse::from_card(&state, card),
            user_id: card.user_id().as_str().to_string(),
            owner_email: owner
                .ok()
                .flatten()
                .map(|u| u.email().to_string()),
        })
        .collect();

    Ok(Json(AdminCardListResponse {
        pagination: PaginationMeta::from(&result),
        cards,
    }))
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteCardResponse {
    pub message: String,
}

/// Delete any card regardless of owner
///
/// DELETE /admin/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(card_id): Path<String>,
) -> Result<Json<DeleteCardResponse>, ApiError> {
    state.cards.delete_any(&CardId::new(card_id)).await?;

    Ok(Json(DeleteCardResponse {
        message: "Card deleted successfully".to_string(),
    }))
}
