//! Dashboard API, authenticated with session tokens
//!
//! Mirrors the v1 card and key operations for the web dashboard and
//! adds an account overview. Handler cores are shared with v1.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PageQuery};
use crate::domain::api_key::ApiKeyId;
use crate::domain::card::CardId;

use super::v1::cards::{
    create_card_core, delete_card_core, get_card_core, list_cards_core, update_card_core,
    CardListResponse, CardResponse, MessageResponse, UpdateCardRequest,
};
use super::v1::keys::{
    create_key_core, list_keys_core, revoke_key_core, ApiKeyListResponse,
    ApiKeyWithSecretResponse, CreateApiKeyRequest, RevokeResponse,
};

/// Create the dashboard router
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/cards", get(list_cards))
        .route("/cards", post(create_card))
        .route(
            "/cards/{card_id}",
            get(get_card).patch(update_card).delete(delete_card),
        )
        .route("/keys", get(list_keys))
        .route("/keys", post(create_key))
        .route("/keys/{key_id}", delete(revoke_key))
}

/// Account overview for the dashboard home page
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cards_count: usize,
    pub total_views: u64,
    pub api_keys_count: usize,
    pub tier: String,
    pub monthly_used: u32,
    pub monthly_limit: u32,
}

/// GET /dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let cards_count = state.cards.count_for_user(user.id()).await?;
    let total_views = state.cards.total_views_for_user(user.id()).await?;
    let api_keys_count = state.api_keys.count_active_for_user(user.id()).await?;

    Ok(Json(StatsResponse {
        cards_count,
        total_views,
        api_keys_count,
        tier: user.tier().to_string(),
        monthly_used: user.monthly_card_count(),
        monthly_limit: state.users.monthly_limit(user.tier()),
    }))
}

/// GET /dashboard/cards
pub async fn list_cards(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<CardListResponse>, ApiError> {
    Ok(Json(list_cards_core(&state, user.id(), query).await?))
}

/// POST /dashboard/cards (multipart/form-data)
pub async fn create_card(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let response = create_card_core(&state, user.id(), multipart).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /dashboard/cards/{card_id}
pub async fn get_card(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(card_id): Path<String>,
) -> Result<Json<CardResponse>, ApiError> {
    Ok(Json(
        get_card_core(&state, user.id(), &CardId::new(card_id)).await?,
    ))
}

/// PATCH /dashboard/cards/{card_id}
pub async fn update_card(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(card_id): Path<String>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    Ok(Json(
        update_card_core(&state, user.id(), &CardId::new(card_id), request).await?,
    ))
}

/// DELETE /dashboard/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(card_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        delete_card_core(&state, user.id(), &CardId::new(card_id)).await?,
    ))
}

/// GET /dashboard/keys
pub async fn list_keys(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ApiKeyListResponse>, ApiError> {
    Ok(Json(list_keys_core(&state, user.id()).await?))
}

/// POST /dashboard/keys
pub async fn create_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyWithSecretResponse>), ApiError> {
    let response = create_key_core(&state, user.id(), request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /dashboard/keys/{key_id}
///
/// The session surface has no "current key", so any owned key may be
/// revoked here.
pub async fn revoke_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(key_id): Path<String>,
) -> Result<Json<RevokeResponse>, ApiError> {
    Ok(Json(
        revoke_key_core(&state, user.id(), &ApiKeyId::new(key_id), None).await?,
    ))
}
