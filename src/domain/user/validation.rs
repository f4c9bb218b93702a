//! User field validation

use thiserror::Error;

/// Errors for user field validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("User ID must be a UUID: {0}")]
    InvalidId(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_EMAIL_LEN: usize = 255;

/// Validate a user ID (UUID format)
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| UserValidationError::InvalidId(id.to_string()))
}

/// Validate an email address.
///
/// Deliberately shallow: one '@' with non-empty local part and a domain
/// containing a dot. Deliverability is proven by the verification email.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let invalid = || UserValidationError::InvalidEmail(email.to_string());

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(invalid());
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(())
}

/// Validate a password for registration or reset
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(UserValidationError::PasswordTooShort);
    }

    Ok(())
}
