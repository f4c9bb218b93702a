//! User infrastructure - password hashing, persistence, account flows

mod password;
mod service;
mod storage_repository;

pub use password::Argon2PasswordHasher;
pub use service::UserService;
pub use storage_repository::StorageUserRepository;
