//! User domain - accounts, tiers, and monthly quota accounting

mod entity;
mod repository;
mod validation;

pub use entity::{Tier, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_user_id, UserValidationError, MIN_PASSWORD_LEN,
};

#[cfg(test)]
pub use repository::mock;
