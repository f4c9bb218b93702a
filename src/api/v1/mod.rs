//! Programmatic API, authenticated with API keys

pub mod cards;
pub mod keys;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::state::AppState;

/// Create the v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Card management
        .route("/cards", get(cards::list_cards))
        .route("/cards", post(cards::create_card))
        .route("/cards/{card_id}", get(cards::get_card))
        .route("/cards/{card_id}", patch(cards::update_card))
        .route("/cards/{card_id}", delete(cards::delete_card))
        // API key management
        .route("/keys", get(keys::list_keys))
        .route("/keys", post(keys::create_key))
        .route("/keys/{key_id}", delete(keys::revoke_key))
}
