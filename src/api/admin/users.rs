//! User management admin endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PageQuery, PaginationMeta};
use crate::domain::user::{Tier, User, UserId, UserRepository};

const ADMIN_PER_PAGE: u32 = 50;
const MAX_PER_PAGE: u32 = 100;

/// User as seen by the admin surface
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: String,
    pub email: String,
    pub tier: String,
    pub is_admin: bool,
    pub email_verified: bool,
    pub monthly_card_count: u32,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl AdminUserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            email: user.email().to_string(),
            tier: user.tier().to_string(),
            is_admin: user.is_admin(),
            email_verified: user.email_verified(),
            monthly_card_count: user.monthly_card_count(),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Paginated user list
#[derive(Debug, Serialize)]
pub struct AdminUserListResponse {
    pub users: Vec<AdminUserResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// List users, optionally filtered by email substring
///
/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<AdminUserListResponse>, ApiError> {
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve(ADMIN_PER_PAGE, MAX_PER_PAGE);
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let result = state.users.repository().search(search, page).await?;

    Ok(Json(AdminUserListResponse {
        pagination: PaginationMeta::from(&result),
        users: result.items.iter().map(AdminUserResponse::from_user).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTierRequest {
    pub tier: String,
}

/// Change a user's tier. Admins cannot change their own tier.
///
/// PUT /admin/users/{user_id}/tier
pub async fn update_tier(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateTierRequest>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    let tier = Tier::parse(&request.tier)
        .ok_or_else(|| ApiError::bad_request("Invalid tier selected").with_param("tier"))?;

    let user_id = UserId::new(user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;

    if &user_id == admin.id() {
        return Err(ApiError::forbidden("You cannot change your own tier"));
    }

    let user = state.users.set_tier(&user_id, tier).await?;

    Ok(Json(AdminUserResponse::from_user(&user)))
}

/// Toggle a user's admin flag. Admins cannot change their own.
///
/// POST /admin/users/{user_id}/admin
pub async fn toggle_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    let user_id = UserId::new(user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;

    if &user_id == admin.id() {
        return Err(ApiError::forbidden("You cannot change your own admin status"));
    }

    let user = state.users.toggle_admin(&user_id).await?;

    Ok(Json(AdminUserResponse::from_user(&user)))
}
