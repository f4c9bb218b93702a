//! API key management endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::{ApiKey, ApiKeyId};
use crate::domain::user::UserId;

/// API key response; the secret never appears here
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<String>,
    pub created_at: String,
    pub revoked_at: Option<String>,
}

impl ApiKeyResponse {
    pub fn from_key(key: &ApiKey) -> Self {
        Self {
            id: key.id().as_str().to_string(),
            name: key.name().to_string(),
            key_prefix: format!("{}...", key.key_prefix()),
            is_active: key.is_active(),
            last_used_at: key.last_used_at().map(|t| t.to_rfc3339()),
            created_at: key.created_at().to_rfc3339(),
            revoked_at: key.revoked_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Key list response
#[derive(Debug, Serialize)]
pub struct ApiKeyListResponse {
    pub keys: Vec<ApiKeyResponse>,
}

/// Creation response: the only place the full secret appears
#[derive(Debug, Serialize)]
pub struct ApiKeyWithSecretResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub key: String,
    pub warning: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

/// Revocation response
#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub message: String,
    pub key: ApiKeyResponse,
}

// Handler cores, shared with the dashboard surface

pub(crate) async fn list_keys_core(
    state: &AppState,
    user_id: &UserId,
) -> Result<ApiKeyListResponse, ApiError> {
    let keys = state.api_keys.list_for_user(user_id).await?;

    Ok(ApiKeyListResponse {
        keys: keys.iter().map(ApiKeyResponse::from_key).collect(),
    })
}

pub(crate) async fn create_key_core(
    state: &AppState,
    user_id: &UserId,
    request: CreateApiKeyRequest,
) -> Result<ApiKeyWithSecretResponse, ApiError> {
    let created = state.api_keys.create(user_id, &request.name).await?;

    Ok(ApiKeyWithSecretResponse {
        api_key: ApiKeyResponse::from_key(&created.api_key),
        key: created.secret,
        warning: "Save this key now! It will not be shown again.".to_string(),
    })
}

pub(crate) async fn revoke_key_core(
    state: &AppState,
    user_id: &UserId,
    key_id: &ApiKeyId,
    authenticating_key: Option<&ApiKeyId>,
) -> Result<RevokeResponse, ApiError> {
    if authenticating_key == Some(key_id) {
        return Err(ApiError::bad_request(
            "You cannot revoke the API key you are currently using",
        ));
    }

    let key = state.api_keys.revoke(user_id, key_id).await?;

    Ok(RevokeResponse {
        message: "API key revoked successfully".to_string(),
        key: ApiKeyResponse::from_key(&key),
    })
}

// Handlers

/// List the authenticated user's API keys, active and revoked
///
/// GET /v1/keys
pub async fn list_keys(
    State(state): State<AppState>,
    auth: RequireApiKey,
) -> Result<Json<ApiKeyListResponse>, ApiError> {
    Ok(Json(list_keys_core(&state, auth.user.id()).await?))
}

/// Create a new API key. The full key is only shown once.
///
/// POST /v1/keys
pub async fn create_key(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyWithSecretResponse>), ApiError> {
    let response = create_key_core(&state, auth.user.id(), request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Revoke an API key. The key authenticating this request cannot
/// revoke itself.
///
/// DELETE /v1/keys/{key_id}
pub async fn revoke_key(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Path(key_id): Path<String>,
) -> Result<Json<RevokeResponse>, ApiError> {
    let key_id = ApiKeyId::new(key_id);

    Ok(Json(
        revoke_key_core(
            &state,
            auth.user.id(),
            &key_id,
            Some(auth.api_key.id()),
        )
        .await?,
    ))
}
