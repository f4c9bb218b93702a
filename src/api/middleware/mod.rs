//! API middleware components

pub mod admin_auth;
pub mod auth;
pub mod security;
pub mod user_auth;

pub use admin_auth::RequireAdmin;
pub use auth::RequireApiKey;
pub use security::security_headers_middleware;
pub use user_auth::RequireUser;
