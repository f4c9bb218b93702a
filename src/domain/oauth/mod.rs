//! OAuth domain - external identities linked to local users

mod entity;
mod repository;

pub use entity::{OAuthAccount, OAuthAccountId, OAuthProvider};
pub use repository::OAuthAccountRepository;
