//! User entity and related types

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_user_id, UserValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};

/// User identifier (UUID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random UserId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for UserId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for User {
    type Key = UserId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Subscription tier bounding monthly card creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Free,
    Core,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Core, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Core => "core",
            Self::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "core" => Some(Self::Core),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User account entity
///
/// The password hash is absent for OAuth-only accounts. It is serialized
/// into storage but never exposed in API responses (separate DTOs used).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Login email, stored lowercased
    email: String,
    /// Argon2 password hash; None for OAuth-only accounts
    password_hash: Option<String>,
    /// Subscription tier
    tier: Tier,
    /// Whether the user may access the admin surface
    is_admin: bool,
    /// Whether the email address has been verified
    email_verified: bool,
    /// Pending verification token, or a "reset:"-prefixed password
    /// reset token. The two are mutually exclusive by construction.
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_token: Option<String>,
    /// Cards created in the current calendar-month window
    monthly_card_count: u32,
    /// Start of the window `monthly_card_count` refers to
    card_count_reset_at: DateTime<Utc>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
    /// Last login timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new unverified user on the free tier
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: email.into().to_lowercase(),
            password_hash: None,
            tier: Tier::Free,
            is_admin: false,
            email_verified: false,
            verification_token: None,
            monthly_card_count: 0,
            card_count_reset_at: now,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Set the password hash
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Set a pending verification token
    pub fn with_verification_token(mut self, token: impl Into<String>) -> Self {
        self.verification_token = Some(token.into());
        self
    }

    /// Mark the email address as verified (OAuth-created accounts)
    pub fn with_verified_email(mut self) -> Self {
        self.email_verified = true;
        self
    }

    /// Grant admin access
    pub fn with_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn verification_token(&self) -> Option<&str> {
        self.verification_token.as_deref()
    }

    pub fn monthly_card_count(&self) -> u32 {
        self.monthly_card_count
    }

    pub fn card_count_reset_at(&self) -> DateTime<Utc> {
        self.card_count_reset_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Mutators

    /// Replace the password hash
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = Some(hash.into());
        self.touch();
    }

    /// Set or rotate the pending verification/reset token
    pub fn set_verification_token(&mut self, token: Option<String>) {
        self.verification_token = token;
        self.touch();
    }

    /// Mark the email address as verified and clear the token
    pub fn mark_verified(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
        self.touch();
    }

    /// Change the subscription tier
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
        self.touch();
    }

    /// Toggle or set admin access
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
        self.touch();
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    // Quota accounting

    /// Reset the monthly counter when `now` falls in a different
    /// calendar month than the stored window start.
    pub fn roll_quota_window(&mut self, now: DateTime<Utc>) {
        let window = self.card_count_reset_at;

        if window.year() != now.year() || window.month() != now.month() {
            self.monthly_card_count = 0;
            self.card_count_reset_at = now;
        }
    }

    /// Whether another card may be created this month under `limit`
    pub fn can_create_card(&mut self, limit: u32, now: DateTime<Utc>) -> bool {
        self.roll_quota_window(now);
        self.monthly_card_count < limit
    }

    /// Count a newly created card against the current window
    pub fn record_card_created(&mut self, now: DateTime<Utc>) {
        self.roll_quota_window(now);
        self.monthly_card_count += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_user(email: &str) -> User {
        User::new(UserId::generate(), email).with_password_hash("hashed_password")
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::generate();
        let parsed = UserId::new(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("not-a-uuid").is_err());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(Tier::parse("free"), Some(Tier::Free));
        assert_eq!(Tier::parse("core"), Some(Tier::Core));
        assert_eq!(Tier::parse("premium"), Some(Tier::Premium));
        assert_eq!(Tier::parse("platinum"), None);
    }

    #[test]
    fn test_new_user_defaults() {
        let user = create_test_user("User@Example.COM");

        assert_eq!(user.email(), "user@example.com");
        assert_eq!(user.tier(), Tier::Free);
        assert!(!user.is_admin());
        assert!(!user.email_verified());
        assert_eq!(user.monthly_card_count(), 0);
    }

    #[test]
    fn test_oauth_only_user_has_no_password() {
        let user = User::new(UserId::generate(), "a@b.co").with_verified_email();
        assert!(user.password_hash().is_none());
        assert!(user.email_verified());
    }

    #[test]
    fn test_mark_verified_clears_token() {
        let mut user = create_test_user("a@b.co").with_verification_token("tok");
        assert_eq!(user.verification_token(), Some("tok"));

        user.mark_verified();
        assert!(user.email_verified());
        assert!(user.verification_token().is_none());
    }

    #[test]
    fn test_quota_within_month() {
        let mut user = create_test_user("a@b.co");
        let now = Utc::now();

        assert!(user.can_create_card(2, now));
        user.record_card_created(now);
        user.record_card_created(now);

        assert_eq!(user.monthly_card_count(), 2);
        assert!(!user.can_create_card(2, now));
    }

    #[test]
    fn test_quota_resets_on_month_rollover() {
        let mut user = create_test_user("a@b.co");
        let january = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let february = Utc.with_ymd_and_hms(2026, 2, 1, 0, 5, 0).unwrap();

        user.roll_quota_window(january);
        user.record_card_created(january);
        user.record_card_created(january);
        assert!(!user.can_create_card(2, january));

        assert!(user.can_create_card(2, february));
        assert_eq!(user.monthly_card_count(), 0);
        assert_eq!(user.card_count_reset_at(), february);
    }

    #[test]
    fn test_quota_resets_across_year_boundary() {
        let mut user = create_test_user("a@b.co");
        let december = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let january = Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap();

        user.roll_quota_window(december);
        user.record_card_created(december);

        assert!(user.can_create_card(1, january));
        assert_eq!(user.monthly_card_count(), 0);
    }

    #[test]
    fn test_tier_change() {
        let mut user = create_test_user("a@b.co");
        user.set_tier(Tier::Premium);
        assert_eq!(user.tier(), Tier::Premium);
    }
}
