//! Cardlink - hosted social card service
//!
//! Users upload an image and metadata; the service stores a processed
//! copy and serves Open Graph/Twitter meta tags to social crawlers
//! while redirecting human visitors to the destination URL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use api::state::{AppState, OAuthState};
use config::AppConfig;
use domain::{ApiKey, Card, OAuthAccount, User};
use infrastructure::api_key::{ApiKeyGenerator, ApiKeyService, StorageApiKeyRepository};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::card::{CardService, StorageCardRepository};
use infrastructure::email::{Mailer, NoopMailer, ResendMailer};
use infrastructure::image::ImageProcessor;
use infrastructure::media::MediaFactory;
use infrastructure::oauth::{
    GoogleOAuthClient, OAuthService, OAuthStateSigner, StorageOAuthAccountRepository,
};
use infrastructure::storage::StorageFactory;
use infrastructure::user::{StorageUserRepository, UserService};

/// Build the application state from configuration: storages,
/// repositories, and services.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let user_storage = StorageFactory::create::<User>(&config.database, "users").await?;
    let card_storage = StorageFactory::create::<Card>(&config.database, "cards").await?;
    let api_key_storage = StorageFactory::create::<ApiKey>(&config.database, "api_keys").await?;
    let oauth_storage =
        StorageFactory::create::<OAuthAccount>(&config.database, "oauth_accounts").await?;

    let user_repo = Arc::new(StorageUserRepository::new(user_storage));

    let mailer: Arc<dyn Mailer> = match &config.email.resend_api_key {
        Some(api_key) => Arc::new(ResendMailer::new(api_key, &config.email.from_address)),
        None => Arc::new(NoopMailer),
    };

    let users = Arc::new(UserService::new(
        user_repo.clone(),
        mailer,
        &config.base_url,
        config.tiers,
    ));

    let media = MediaFactory::create(&config.media, &config.base_url).await?;

    let cards = Arc::new(CardService::new(
        Arc::new(StorageCardRepository::new(card_storage)),
        users.clone(),
        media,
        ImageProcessor::new(config.upload.max_image_bytes),
    ));

    let api_keys = Arc::new(ApiKeyService::new(
        Arc::new(StorageApiKeyRepository::new(api_key_storage)),
        ApiKeyGenerator::new(&config.auth.api_key_prefix),
    ));

    let jwt = Arc::new(JwtService::new(JwtConfig::new(
        &config.auth.jwt_secret,
        config.auth.session_ttl_hours,
    )));

    let oauth = config.oauth.google.as_ref().map(|google| OAuthState {
        client: Arc::new(GoogleOAuthClient::new(google.clone())),
        service: Arc::new(OAuthService::new(
            Arc::new(StorageOAuthAccountRepository::new(oauth_storage)),
            user_repo,
        )),
        state_signer: OAuthStateSigner::new(&config.auth.jwt_secret),
    });

    Ok(AppState {
        users,
        cards,
        api_keys,
        jwt,
        oauth,
        base_url: config.base_url.trim_end_matches('/').to_string(),
    })
}
