//! Google OAuth client
//!
//! Authorization-code flow against Google's OAuth endpoints, plus the
//! signed state tokens that replace server-side session state.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::GoogleOAuthConfig;
use crate::domain::DomainError;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

/// Lifetime of an OAuth state token
const STATE_TTL_MINUTES: i64 = 10;

/// Identity returned by Google's userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for Google's OAuth authorization-code flow
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    /// Override token/userinfo endpoints (integration tests)
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    /// Build the authorization redirect URL
    pub fn authorize_url(&self, state: &str) -> Result<String, DomainError> {
        let url = reqwest::Url::parse_with_params(
            &self.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", "email"),
                ("state", state),
            ],
        )
        .map_err(|e| DomainError::oauth("google", format!("Invalid authorize URL: {}", e)))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, DomainError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::oauth("google", format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::oauth(
                "google",
                format!("Token endpoint returned {}", response.status()),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::oauth("google", format!("Invalid token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Fetch the authenticated user's identity
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, DomainError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DomainError::oauth("google", format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::oauth(
                "google",
                format!("Userinfo endpoint returned {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::oauth("google", format!("Invalid userinfo response: {}", e)))
    }
}

/// Claims of a signed OAuth state parameter
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    purpose: String,
    nonce: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies the `state` parameter of the OAuth flow.
///
/// Sessions here are stateless, so CSRF protection for the callback is
/// carried in the parameter itself: a short-lived signed token.
#[derive(Clone)]
pub struct OAuthStateSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for OAuthStateSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthStateSigner").finish()
    }
}

impl OAuthStateSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a fresh state token
    pub fn issue(&self) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = StateClaims {
            purpose: "oauth_state".to_string(),
            nonce: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign state token: {}", e)))
    }

    /// Verify a state token from the callback
    pub fn verify(&self, state: &str) -> Result<(), DomainError> {
        let data = decode::<StateClaims>(state, &self.decoding_key, &Validation::default())
            .map_err(|_| DomainError::oauth("google", "Invalid or expired state parameter"))?;

        if data.claims.purpose != "oauth_state" {
            return Err(DomainError::oauth("google", "Invalid state parameter"));
        }

        Ok(())
    }
}
