//! Google OAuth endpoints

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::warn;

use crate::api::state::{AppState, OAuthState};
use crate::api::types::{ApiError, Json};
use crate::domain::oauth::OAuthProvider;

use super::LoginResponse;

fn require_oauth(state: &AppState) -> Result<&OAuthState, ApiError> {
    state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Google OAuth is not configured"))
}

/// Begin the Google OAuth flow
///
/// GET /auth/google
///
/// Redirects to Google's consent screen with a signed state parameter.
pub async fn start(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let oauth = require_oauth(&state)?;

    let state_token = oauth.state_signer.issue().map_err(ApiError::from)?;
    let url = oauth
        .client
        .authorize_url(&state_token)
        .map_err(ApiError::from)?;

    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set by Google when the user denied consent
    #[serde(default)]
    pub error: Option<String>,
}

/// Complete the Google OAuth flow
///
/// GET /auth/google/callback
///
/// Exchanges the code, resolves the identity to a local account, and
/// returns a session token.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<LoginResponse>, ApiError> {
    let oauth = require_oauth(&state)?;

    if let Some(error) = query.error {
        warn!(%error, "Google OAuth denied");
        return Err(ApiError::unauthorized("Failed to authenticate with Google"));
    }

    let state_token = query
        .state
        .ok_or_else(|| ApiError::bad_request("Missing state parameter"))?;
    oauth
        .state_signer
        .verify(&state_token)
        .map_err(ApiError::from)?;

    let code = query
        .code
        .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;

    let access_token = oauth.client.exchange_code(&code).await?;
    let info = oauth.client.fetch_userinfo(&access_token).await?;

    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Could not get email from Google"))?;

    let (user, _outcome) = oauth
        .service
        .login(OAuthProvider::Google, &info.id, &email)
        .await?;

    Ok(Json(LoginResponse::issue(&state, &user)?))
}
