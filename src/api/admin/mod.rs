//! Admin API endpoints for user and card management

pub mod cards;
pub mod stats;
pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create the admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // User management
        .route("/users", get(users::list_users))
        .route("/users/{user_id}/tier", put(users::update_tier))
        .route("/users/{user_id}/admin", post(users::toggle_admin))
        // Card management
        .route("/cards", get(cards::list_cards))
        .route("/cards/{card_id}", delete(cards::delete_card))
        // System statistics
        .route("/stats", get(stats::stats))
}
