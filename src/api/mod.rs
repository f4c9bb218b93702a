//! API layer - HTTP endpoints and middleware

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod middleware;
pub mod public;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use middleware::{RequireAdmin, RequireApiKey, RequireUser};
pub use router::create_router;
pub use state::AppState;
