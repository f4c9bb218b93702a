//! User service
//!
//! Registration, verification, password reset, authentication, and
//! quota accounting. Email delivery is best-effort: failures are
//! logged and never fail the triggering operation.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::RngCore;
use tracing::{info, warn};

use crate::config::TierLimits;
use crate::domain::user::{
    validate_email, validate_password, Tier, User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::email::{
    password_reset_email, verification_email, welcome_email, Mailer,
};

use super::password::Argon2PasswordHasher;

/// Prefix distinguishing password-reset tokens from verification tokens
const RESET_TOKEN_NAMESPACE: &str = "reset:";

/// User service
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Argon2PasswordHasher,
    mailer: Arc<dyn Mailer>,
    base_url: String,
    tiers: TierLimits,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        base_url: impl Into<String>,
        tiers: TierLimits,
    ) -> Self {
        Self {
            repository,
            hasher: Argon2PasswordHasher::new(),
            mailer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tiers,
        }
    }

    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repository
    }

    /// Monthly card limit for a user's tier
    pub fn monthly_limit(&self, tier: Tier) -> u32 {
        self.tiers.limit_for(tier)
    }

    /// Register a new password user and send the verification email
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let token = generate_token();
        let hash = self.hasher.hash(password)?;

        let user = User::new(UserId::generate(), &email)
            .with_password_hash(hash)
            .with_verification_token(token.clone());

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), "Registered user");

        self.send_verification(&email, &token).await;

        Ok(user)
    }

    /// Verify an email address by token and send the welcome email
    pub async fn verify_email(&self, token: &str) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get_by_verification_token(token)
            .await?
            .ok_or_else(|| DomainError::not_found("Invalid or expired verification link"))?;

        if user.email_verified() {
            return Ok(user);
        }

        user.mark_verified();
        let user = self.repository.update(&user).await?;
        info!(user_id = %user.id(), "Email verified");

        let message = welcome_email(
            user.email(),
            &format!("{}/dashboard", self.base_url),
            self.tiers.limit_for(user.tier()),
        );
        if let Err(e) = self.mailer.send(&message).await {
            warn!("Failed to send welcome email: {}", e);
        }

        Ok(user)
    }

    /// Rotate and resend a verification token.
    ///
    /// Always succeeds from the caller's perspective so account
    /// existence cannot be probed.
    pub async fn resend_verification(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();

        if let Some(mut user) = self.repository.get_by_email(&email).await? {
            if !user.email_verified() {
                let token = generate_token();
                user.set_verification_token(Some(token.clone()));
                self.repository.update(&user).await?;

                self.send_verification(&email, &token).await;
            }
        }

        Ok(())
    }

    /// Authenticate an email/password pair
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        let invalid = || DomainError::credential("Invalid email or password");

        let mut user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let hash = user.password_hash().ok_or_else(invalid)?;
        if !self.hasher.verify(password, hash) {
            return Err(invalid());
        }

        if !user.email_verified() {
            return Err(DomainError::forbidden(
                "Please verify your email address before logging in",
            ));
        }

        user.record_login();
        let user = self.repository.update(&user).await?;

        Ok(user)
    }

    /// Start a password reset. Anti-enumeration: always succeeds.
    pub async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();

        if let Some(mut user) = self.repository.get_by_email(&email).await? {
            if user.email_verified() {
                let token = generate_token();
                user.set_verification_token(Some(format!(
                    "{}{}",
                    RESET_TOKEN_NAMESPACE, token
                )));
                self.repository.update(&user).await?;

                let url = format!("{}/auth/reset-password/{}", self.base_url, token);
                if let Err(e) = self.mailer.send(&password_reset_email(&email, &url)).await {
                    warn!("Failed to send password reset email: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Complete a password reset
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        let namespaced = format!("{}{}", RESET_TOKEN_NAMESPACE, token);
        let mut user = self
            .repository
            .get_by_verification_token(&namespaced)
            .await?
            .ok_or_else(|| DomainError::not_found("Invalid or expired reset link"))?;

        let hash = self.hasher.hash(new_password)?;
        user.set_password_hash(hash);
        user.set_verification_token(None);

        let user = self.repository.update(&user).await?;
        info!(user_id = %user.id(), "Password reset");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Change a user's tier
    pub async fn set_tier(&self, id: &UserId, tier: Tier) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        let old_tier = user.tier();
        user.set_tier(tier);
        let user = self.repository.update(&user).await?;
        info!(user_id = %id, %old_tier, new_tier = %tier, "Tier updated");

        Ok(user)
    }

    /// Toggle a user's admin flag, returning the updated user
    pub async fn toggle_admin(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        user.set_admin(!user.is_admin());
        let user = self.repository.update(&user).await?;
        info!(user_id = %id, is_admin = user.is_admin(), "Admin flag toggled");

        Ok(user)
    }

    /// Create a verified admin account (bootstrap CLI)
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let hash = self.hasher.hash(password)?;
        let user = User::new(UserId::generate(), &email)
            .with_password_hash(hash)
            .with_verified_email()
            .with_admin();

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), "Created admin user");

        Ok(user)
    }

    /// Check the monthly quota, rolling the window first. Errors with
    /// QuotaExceeded when the limit is reached.
    pub async fn ensure_can_create_card(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        let limit = self.tiers.limit_for(user.tier());
        let now = Utc::now();

        if !user.can_create_card(limit, now) {
            return Err(DomainError::quota_exceeded(user.monthly_card_count(), limit));
        }

        // Persist a window roll so the stored counter matches
        self.repository.update(&user).await
    }

    /// Count a created card against the user's monthly quota
    pub async fn record_card_created(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        user.record_card_created(Utc::now());
        self.repository.update(&user).await
    }

    async fn require(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    async fn send_verification(&self, email: &str, token: &str) {
        let url = format!("{}/auth/verify/{}", self.base_url, token);
        if let Err(e) = self.mailer.send(&verification_email(email, &url)).await {
            warn!("Failed to send verification email: {}", e);
        }
    }
}

/// URL-safe random token for verification and reset links
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
