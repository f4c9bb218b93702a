//! API key authentication middleware

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKey;
use crate::domain::user::User;

/// Extractor that requires a valid API key.
///
/// Extracts the key from either:
/// - Authorization header: `Bearer <api_key>`
/// - X-API-Key header: `<api_key>`
///
/// Resolves the owning user and rejects keys whose owner has not
/// verified their email.
#[derive(Debug, Clone)]
pub struct RequireApiKey {
    pub api_key: ApiKey,
    pub user: User,
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key_value = extract_api_key_from_headers(&parts.headers)?;

        debug!(
            key_prefix = %key_value.chars().take(8).collect::<String>(),
            "Validating API key"
        );

        let api_key = state
            .api_keys
            .validate(&key_value)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::unauthorized("The provided API key is invalid or has been revoked")
            })?;

        let user = state
            .users
            .get(api_key.user_id())
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::unauthorized("The provided API key is invalid or has been revoked")
            })?;

        if !user.email_verified() {
            return Err(ApiError::forbidden(
                "Please verify your email address before using the API",
            ));
        }

        Ok(RequireApiKey { api_key, user })
    }
}

fn extract_api_key_from_headers(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    // Authorization header first (Bearer token)
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    // Then X-API-Key
    if let Some(api_key_header) = headers.get("x-api-key") {
        let key = api_key_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?;

        return Ok(key.trim().to_string());
    }

    Err(ApiError::unauthorized(
        "API key required. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer ck_live_test12345".parse().unwrap(),
        );

        let result = extract_api_key_from_headers(&headers);
        assert_eq!(result.unwrap(), "ck_live_test12345");
    }

    #[test]
    fn test_extract_x_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "ck_live_test67890".parse().unwrap());

        let result = extract_api_key_from_headers(&headers);
        assert_eq!(result.unwrap(), "ck_live_test67890");
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer ck_live_bearer".parse().unwrap(),
        );
        headers.insert("x-api-key", "ck_live_xapikey".parse().unwrap());

        let result = extract_api_key_from_headers(&headers);
        assert_eq!(result.unwrap(), "ck_live_bearer");
    }

    #[test]
    fn test_missing_api_key() {
        let result = extract_api_key_from_headers(&HeaderMap::new());

        assert_eq!(result.unwrap_err().status, StatusCode::UNAUTHORIZED);
    }
}
