//! Authentication infrastructure - stateless session tokens

mod jwt;

pub use jwt::{JwtConfig, JwtService, SessionClaims};
