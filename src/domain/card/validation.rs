//! Card field validation

use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_DESTINATION_URL_LEN: usize = 2048;

/// Errors for card field validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title must be {MAX_TITLE_LEN} characters or less")]
    TitleTooLong,

    #[error("Description must be {MAX_DESCRIPTION_LEN} characters or less")]
    DescriptionTooLong,

    #[error("Destination URL cannot be empty")]
    EmptyDestinationUrl,

    #[error("Destination URL must be {MAX_DESTINATION_URL_LEN} characters or less")]
    DestinationUrlTooLong,

    #[error("Destination URL must start with http:// or https://")]
    InvalidDestinationUrl,
}

/// Validate and normalize a card title
pub fn validate_title(title: &str) -> Result<String, CardValidationError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(CardValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CardValidationError::TitleTooLong);
    }

    Ok(title.to_string())
}

/// Validate and normalize an optional description.
///
/// Whitespace-only input collapses to None.
pub fn validate_description(
    description: Option<&str>,
) -> Result<Option<String>, CardValidationError> {
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(CardValidationError::DescriptionTooLong)
        }
        Some(d) => Ok(Some(d.to_string())),
        None => Ok(None),
    }
}

/// Validate and normalize a destination URL
pub fn validate_destination_url(url: &str) -> Result<String, CardValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(CardValidationError::EmptyDestinationUrl);
    }
    if url.len() > MAX_DESTINATION_URL_LEN {
        return Err(CardValidationError::DestinationUrlTooLong);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CardValidationError::InvalidDestinationUrl);
    }

    Ok(url.to_string())
}
