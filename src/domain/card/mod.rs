//! Card domain - social cards, slugs, and their validation rules

mod entity;
mod repository;
mod slug;
mod validation;

pub use entity::{Card, CardId, CardType};
pub use repository::{CardRepository, CardSearch};
pub use slug::{Slug, SLUG_LEN};
pub use validation::{
    validate_description, validate_destination_url, validate_title, CardValidationError,
    MAX_DESCRIPTION_LEN, MAX_DESTINATION_URL_LEN, MAX_TITLE_LEN,
};

#[cfg(test)]
pub use repository::mock;
