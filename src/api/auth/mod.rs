//! Authentication API endpoints
//!
//! Registration, login, email verification, password reset, and the
//! Google OAuth flow. Sessions are stateless bearer tokens.

mod google;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .route("/verify/{token}", get(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/google", get(google::start))
        .route("/google/callback", get(google::callback))
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub tier: String,
    pub is_admin: bool,
    pub email_verified: bool,
    pub monthly_card_count: u32,
    pub monthly_limit: u32,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserResponse {
    pub fn from_user(state: &AppState, user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            email: user.email().to_string(),
            tier: user.tier().to_string(),
            is_admin: user.is_admin(),
            email_verified: user.email_verified(),
            monthly_card_count: user.monthly_card_count(),
            monthly_limit: state.users.monthly_limit(user.tier()),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Login response carrying a fresh session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

impl LoginResponse {
    pub(super) fn issue(state: &AppState, user: &User) -> Result<Self, ApiError> {
        let token = state.jwt.generate(user).map_err(ApiError::from)?;
        let expires_at = Utc::now() + Duration::hours(state.jwt.ttl_hours() as i64);

        Ok(Self {
            token,
            user: UserResponse::from_user(state, user),
            expires_at: expires_at.to_rfc3339(),
        })
    }
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<MessageResponse>), ApiError> {
    state
        .users
        .register(&request.email, &request.password)
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account created! Please check your email to verify your address.",
        )),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns a session token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse::issue(&state, &user)?))
}

/// Logout (client-side only for stateless tokens)
///
/// POST /auth/logout
pub async fn logout(_user: RequireUser) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// Get the current authenticated user
///
/// GET /auth/me
pub async fn get_current_user(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&state, &user)))
}

/// Verify an email address
///
/// GET /auth/verify/{token}
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.verify_email(&token).await?;

    Ok(Json(MessageResponse::new(
        "Email verified successfully! You can now log in.",
    )))
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Resend the verification email
///
/// POST /auth/resend-verification
///
/// Responds identically whether or not the account exists.
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.resend_verification(&request.email).await?;

    Ok(Json(MessageResponse::new(
        "If an account exists with that email, a verification link has been sent.",
    )))
}

/// Start a password reset
///
/// POST /auth/forgot-password
///
/// Responds identically whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.forgot_password(&request.email).await?;

    Ok(Json(MessageResponse::new(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Complete a password reset
///
/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .users
        .reset_password(&request.token, &request.password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset successfully! You can now log in.",
    )))
}
