//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::card::CardService;
use crate::infrastructure::oauth::{GoogleOAuthClient, OAuthService, OAuthStateSigner};
use crate::infrastructure::user::UserService;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub cards: Arc<CardService>,
    pub api_keys: Arc<ApiKeyService>,
    pub jwt: Arc<JwtService>,
    /// Google OAuth wiring; None when not configured
    pub oauth: Option<OAuthState>,
    /// Public base URL used to build share and image links
    pub base_url: String,
}

/// Google OAuth wiring
#[derive(Clone)]
pub struct OAuthState {
    pub client: Arc<GoogleOAuthClient>,
    pub service: Arc<OAuthService>,
    pub state_signer: OAuthStateSigner,
}

impl AppState {
    /// Share link for a card slug
    pub fn card_url(&self, slug: &str) -> String {
        format!("{}/c/{}", self.base_url, slug)
    }

    /// Image link for a card slug
    pub fn image_url(&self, slug: &str) -> String {
        format!("{}/i/{}.png", self.base_url, slug)
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::config::TierLimits;
    use crate::domain::{ApiKey, Card, OAuthAccount, User};
    use crate::infrastructure::api_key::{ApiKeyGenerator, StorageApiKeyRepository};
    use crate::infrastructure::auth::JwtConfig;
    use crate::infrastructure::card::StorageCardRepository;
    use crate::infrastructure::email::NoopMailer;
    use crate::infrastructure::image::ImageProcessor;
    use crate::infrastructure::media::LocalMediaStore;
    use crate::infrastructure::oauth::StorageOAuthAccountRepository;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::user::StorageUserRepository;

    /// Fully in-memory application state for handler tests
    pub fn test_state() -> AppState {
        let base_url = "http://localhost:8080".to_string();

        let user_repo = Arc::new(StorageUserRepository::new(Arc::new(
            InMemoryStorage::<User>::new(),
        )));
        let users = Arc::new(UserService::new(
            user_repo.clone(),
            Arc::new(NoopMailer),
            &base_url,
            TierLimits::default(),
        ));

        let media_dir =
            std::env::temp_dir().join(format!("cardlink-test-{}", uuid::Uuid::new_v4()));
        let media = Arc::new(LocalMediaStore::new(&media_dir, &base_url));

        let cards = Arc::new(CardService::new(
            Arc::new(StorageCardRepository::new(Arc::new(
                InMemoryStorage::<Card>::new(),
            ))),
            users.clone(),
            media,
            ImageProcessor::new(5 * 1024 * 1024),
        ));

        let api_keys = Arc::new(ApiKeyService::new(
            Arc::new(StorageApiKeyRepository::new(Arc::new(InMemoryStorage::<
                ApiKey,
            >::new()))),
            ApiKeyGenerator::new("ck_live_"),
        ));

        let oauth_accounts = Arc::new(StorageOAuthAccountRepository::new(Arc::new(
            InMemoryStorage::<OAuthAccount>::new(),
        )));
        let oauth_service = Arc::new(OAuthService::new(oauth_accounts, user_repo));

        let oauth = Some(OAuthState {
            client: Arc::new(GoogleOAuthClient::new(crate::config::GoogleOAuthConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_url: format!("{}/auth/google/callback", base_url),
            })),
            service: oauth_service,
            state_signer: OAuthStateSigner::new("test-jwt-secret"),
        });

        AppState {
            users,
            cards,
            api_keys,
            jwt: Arc::new(JwtService::new(JwtConfig::new("test-jwt-secret", 168))),
            oauth,
            base_url,
        }
    }
}
