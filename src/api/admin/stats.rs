//! System statistics admin endpoint

use axum::extract::State;
use serde::Serialize;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{Tier, UserRepository};

/// System-wide statistics
#[derive(Debug, Serialize)]
pub struct SystemStatsResponse {
    pub total_users: usize,
    pub verified_users: usize,
    pub total_cards: usize,
    pub total_views: u64,
    pub tier_counts: TierCounts,
}

/// User counts per tier
#[derive(Debug, Serialize)]
pub struct TierCounts {
    pub free: usize,
    pub core: usize,
    pub premium: usize,
}

/// GET /admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<SystemStatsResponse>, ApiError> {
    let users = state.users.repository();

    let total_users = users.count().await?;
    let verified_users = users.count_verified().await?;
    let by_tier = users.count_by_tier().await?;

    let total_cards = state.cards.count().await?;
    let total_views = state.cards.total_views().await?;

    Ok(Json(SystemStatsResponse {
        total_users,
        verified_users,
        total_cards,
        total_views,
        tier_counts: TierCounts {
            free: by_tier.get(&Tier::Free).copied().unwrap_or(0),
            core: by_tier.get(&Tier::Core).copied().unwrap_or(0),
            premium: by_tier.get(&Tier::Premium).copied().unwrap_or(0),
        },
    }))
}
