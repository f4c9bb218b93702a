//! Linked OAuth account entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// OAuth provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key for a linked account: `{provider}:{provider_user_id}`.
///
/// The composite key is what enforces the one-link-per-provider-identity
/// uniqueness constraint in key-value backends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OAuthAccountId(String);

impl OAuthAccountId {
    pub fn new(provider: OAuthProvider, provider_user_id: &str) -> Self {
        Self(format!("{}:{}", provider, provider_user_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OAuthAccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for OAuthAccountId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for OAuthAccount {
    type Key = OAuthAccountId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// An external identity linked to a local user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthAccount {
    id: OAuthAccountId,
    provider: OAuthProvider,
    provider_user_id: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl OAuthAccount {
    pub fn new(
        provider: OAuthProvider,
        provider_user_id: impl Into<String>,
        user_id: UserId,
    ) -> Self {
        let provider_user_id = provider_user_id.into();

        Self {
            id: OAuthAccountId::new(provider, &provider_user_id),
            provider,
            provider_user_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &OAuthAccountId {
        &self.id
    }

    pub fn provider(&self) -> OAuthProvider {
        self.provider
    }

    pub fn provider_user_id(&self) -> &str {
        &self.provider_user_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
