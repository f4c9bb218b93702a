//! Card infrastructure - persistence and the card lifecycle service

mod service;
mod storage_repository;

pub use service::{CardService, CardUpdate, ImageUpload, NewCard};
pub use storage_repository::StorageCardRepository;
