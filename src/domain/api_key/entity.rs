//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

pub const MAX_KEY_NAME_LEN: usize = 100;

/// API key identifier (UUID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Generate a fresh random ApiKeyId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ApiKeyId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for ApiKey {
    type Key = ApiKeyId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// API key entity
///
/// The secret itself is hashed at rest; only the prefix survives in the
/// clear for identification. The full key is shown once at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Owning user
    user_id: UserId,
    /// Display name for the key
    name: String,
    /// Hashed secret, format `sha256$<base64url>`
    secret_hash: String,
    /// Unique prefix for identification (type prefix + 8 random chars)
    key_prefix: String,
    /// Last time the key authenticated a request
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Revocation timestamp; a revoked key never authenticates again
    #[serde(skip_serializing_if = "Option::is_none")]
    revoked_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Create a new active API key
    pub fn new(
        id: ApiKeyId,
        user_id: UserId,
        name: impl Into<String>,
        secret_hash: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            secret_hash: secret_hash.into(),
            key_prefix: key_prefix.into(),
            last_used_at: None,
            created_at: Utc::now(),
            revoked_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    /// Whether the key may still authenticate requests
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    // Mutators

    /// Record key usage
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
    }

    /// Revoke the key. Idempotent: the first revocation timestamp wins.
    pub fn revoke(&mut self) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(name: &str) -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            UserId::generate(),
            name,
            "sha256$hash",
            "ck_live_abc12345",
        )
    }

    #[test]
    fn test_new_key_is_active() {
        let key = create_test_key("CI deploys");

        assert!(key.is_active());
        assert!(key.last_used_at().is_none());
        assert!(key.revoked_at().is_none());
        assert_eq!(key.name(), "CI deploys");
    }

    #[test]
    fn test_revoke() {
        let mut key = create_test_key("CI deploys");

        key.revoke();
        assert!(!key.is_active());

        let first = key.revoked_at();
        key.revoke();
        assert_eq!(key.revoked_at(), first);
    }

    #[test]
    fn test_record_usage() {
        let mut key = create_test_key("CI deploys");

        key.record_usage();
        assert!(key.last_used_at().is_some());
    }
}
