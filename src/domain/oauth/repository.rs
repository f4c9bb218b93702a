//! OAuth account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{OAuthAccount, OAuthAccountId, OAuthProvider};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for linked OAuth accounts
#[async_trait]
pub trait OAuthAccountRepository: Send + Sync + Debug {
    /// Look up a link by provider identity
    async fn get(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<OAuthAccount>, DomainError>;

    /// Create a new link; conflicts if the provider identity is taken
    async fn create(&self, account: OAuthAccount) -> Result<OAuthAccount, DomainError>;

    /// All links belonging to a user
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<OAuthAccount>, DomainError>;

    /// Remove a link, returns true if deleted
    async fn delete(&self, id: &OAuthAccountId) -> Result<bool, DomainError>;
}
