//! API key service
//!
//! High-level key lifecycle: creation (the only moment the secret is
//! visible), authentication lookups, and revocation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, MAX_KEY_NAME_LEN};
use crate::domain::user::UserId;
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreateApiKeyResult {
    /// The API key entity (without the secret)
    pub api_key: ApiKey,
    /// The full secret key (only returned once)
    pub secret: String,
}

/// API key service
#[derive(Debug)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>, generator: ApiKeyGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Create a new API key for a user
    pub async fn create(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<CreateApiKeyResult, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Please provide a name for the API key"));
        }
        if name.chars().count() > MAX_KEY_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Name must be {} characters or less",
                MAX_KEY_NAME_LEN
            )));
        }

        let generated = self.generator.generate();
        let api_key = ApiKey::new(
            ApiKeyId::generate(),
            user_id.clone(),
            name,
            &generated.hash,
            &generated.prefix,
        );

        let created = self.repository.create(api_key).await?;
        info!(key_id = %created.id(), user_id = %user_id, "API key created");

        Ok(CreateApiKeyResult {
            api_key: created,
            secret: generated.key,
        })
    }

    /// Resolve a presented secret to an active key.
    ///
    /// Returns None for unknown prefixes, hash mismatches, and revoked
    /// keys; callers cannot distinguish which. Usage is recorded
    /// best-effort.
    pub async fn validate(&self, key_secret: &str) -> Result<Option<ApiKey>, DomainError> {
        let Some(prefix) = ApiKeyGenerator::extract_prefix(key_secret) else {
            return Ok(None);
        };

        debug!(prefix, "Validating API key");

        let Some(key) = self.repository.get_by_prefix(prefix).await? else {
            return Ok(None);
        };

        if !self.generator.verify_key(key_secret, key.secret_hash()) {
            debug!(prefix, "API key hash verification failed");
            return Ok(None);
        }

        if !key.is_active() {
            debug!(key_id = %key.id(), "API key is revoked");
            return Ok(None);
        }

        if let Err(e) = self.repository.record_usage(key.id()).await {
            warn!("Failed to record API key usage: {}", e);
        }

        Ok(Some(key))
    }

    /// Get a key owned by the given user
    pub async fn get_owned(
        &self,
        user_id: &UserId,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKey>, DomainError> {
        Ok(self
            .repository
            .get(id)
            .await?
            .filter(|k| k.user_id() == user_id))
    }

    /// All keys belonging to a user, newest first
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list_for_user(user_id).await
    }

    /// Count of active keys belonging to a user
    pub async fn count_active_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.repository.count_active_for_user(user_id).await
    }

    /// Revoke a key owned by the given user
    pub async fn revoke(&self, user_id: &UserId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        let mut key = self
            .get_owned(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        if !key.is_active() {
            return Err(DomainError::validation(
                "This API key has already been revoked",
            ));
        }

        key.revoke();
        let key = self.repository.update(&key).await?;
        info!(key_id = %id, "API key revoked");

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::mock::MockApiKeyRepository;

    fn service() -> ApiKeyService {
        ApiKeyService::new(
            Arc::new(MockApiKeyRepository::new()),
            ApiKeyGenerator::new("ck_live_"),
        )
    }

    #[tokio::test]
    async fn test_create_and_validate() {
        let service = service();
        let user_id = UserId::generate();

        let created = service.create(&user_id, "CI deploys").await.unwrap();
        assert!(created.secret.starts_with("ck_live_"));

        let validated = service.validate(&created.secret).await.unwrap();
        assert!(validated.is_some());
        assert_eq!(validated.unwrap().id(), created.api_key.id());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_names() {
        let service = service();
        let user_id = UserId::generate();

        assert!(service.create(&user_id, "   ").await.is_err());
        assert!(service.create(&user_id, &"x".repeat(101)).await.is_err());
    }

    #[tokio::test]
    async fn test_validate_rejects_wrong_secret() {
        let service = service();
        let user_id = UserId::generate();

        let created = service.create(&user_id, "Key").await.unwrap();

        // Same prefix, different secret tail
        let mut forged = created.secret.clone();
        forged.push('x');
        assert!(service.validate(&forged).await.unwrap().is_none());

        assert!(service.validate("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_rejects_revoked() {
        let service = service();
        let user_id = UserId::generate();

        let created = service.create(&user_id, "Key").await.unwrap();
        service.revoke(&user_id, created.api_key.id()).await.unwrap();

        assert!(service.validate(&created.secret).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_twice_fails() {
        let service = service();
        let user_id = UserId::generate();

        let created = service.create(&user_id, "Key").await.unwrap();
        service.revoke(&user_id, created.api_key.id()).await.unwrap();

        let result = service.revoke(&user_id, created.api_key.id()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_revoke_scoped_to_owner() {
        let service = service();
        let owner = UserId::generate();
        let other = UserId::generate();

        let created = service.create(&owner, "Key").await.unwrap();

        let result = service.revoke(&other, created.api_key.id()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validate_records_usage() {
        let service = service();
        let user_id = UserId::generate();

        let created = service.create(&user_id, "Key").await.unwrap();
        service.validate(&created.secret).await.unwrap();

        let keys = service.list_for_user(&user_id).await.unwrap();
        assert!(keys[0].last_used_at().is_some());
    }
}
