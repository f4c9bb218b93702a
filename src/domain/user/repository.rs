//! User repository trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

use super::entity::{Tier, User, UserId};
use crate::domain::page::{PagedResult, PageRequest};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (expects a lowercased email)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by pending verification/reset token
    async fn get_by_verification_token(&self, token: &str)
        -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returns true if deleted
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Page through users, optionally filtered by email substring,
    /// newest first
    async fn search(
        &self,
        email_query: Option<&str>,
        page: PageRequest,
    ) -> Result<PagedResult<User>, DomainError>;

    /// Total user count
    async fn count(&self) -> Result<usize, DomainError>;

    /// Count of users with verified email addresses
    async fn count_verified(&self) -> Result<usize, DomainError>;

    /// User counts grouped by tier
    async fn count_by_tier(&self) -> Result<HashMap<Tier, usize>, DomainError>;
}
