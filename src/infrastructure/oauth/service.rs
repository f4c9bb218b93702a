//! OAuth account resolution
//!
//! Maps a verified external identity onto a local user: log in through
//! an existing link, link to an account with the same email, or create
//! a fresh pre-verified account.

use std::sync::Arc;

use tracing::info;

use crate::domain::oauth::{OAuthAccount, OAuthAccountRepository, OAuthProvider};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// How an OAuth login resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthLoginOutcome {
    /// Existing link, existing user
    LoggedIn,
    /// Linked the identity to an existing user with the same email
    Linked,
    /// Created a new user for this identity
    Created,
}

/// OAuth account service
#[derive(Debug)]
pub struct OAuthService {
    accounts: Arc<dyn OAuthAccountRepository>,
    users: Arc<dyn UserRepository>,
}

impl OAuthService {
    pub fn new(accounts: Arc<dyn OAuthAccountRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { accounts, users }
    }

    /// Resolve an external identity to a logged-in local user
    pub async fn login(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
        email: &str,
    ) -> Result<(User, OAuthLoginOutcome), DomainError> {
        let email = email.trim().to_lowercase();

        // Existing link wins regardless of the email on file
        if let Some(account) = self.accounts.get(provider, provider_user_id).await? {
            let user = self
                .users
                .get(account.user_id())
                .await?
                .ok_or_else(|| {
                    DomainError::internal(format!(
                        "OAuth account '{}' references missing user",
                        account.id()
                    ))
                })?;

            return Ok((self.record_login(user).await?, OAuthLoginOutcome::LoggedIn));
        }

        // Same email: link the identity to the existing account
        if let Some(user) = self.users.get_by_email(&email).await? {
            self.accounts
                .create(OAuthAccount::new(
                    provider,
                    provider_user_id,
                    user.id().clone(),
                ))
                .await?;
            info!(user_id = %user.id(), %provider, "Linked OAuth identity to existing user");

            return Ok((self.record_login(user).await?, OAuthLoginOutcome::Linked));
        }

        // Fresh account; provider-verified email needs no verification
        let user = User::new(UserId::generate(), &email).with_verified_email();
        let user = self.users.create(user).await?;

        self.accounts
            .create(OAuthAccount::new(
                provider,
                provider_user_id,
                user.id().clone(),
            ))
            .await?;
        info!(user_id = %user.id(), %provider, "Created user from OAuth identity");

        Ok((self.record_login(user).await?, OAuthLoginOutcome::Created))
    }

    async fn record_login(&self, mut user: User) -> Result<User, DomainError> {
        user.record_login();
        self.users.update(&user).await
    }
}
