//! OAuth infrastructure - provider client and account resolution

mod google;
mod service;
mod storage_repository;

pub use google::{GoogleOAuthClient, GoogleUserInfo, OAuthStateSigner};
pub use service::{OAuthLoginOutcome, OAuthService};
pub use storage_repository::StorageOAuthAccountRepository;
