//! Media store abstraction for uploaded and processed card images

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::domain::DomainError;

/// How a stored object is best served to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServingMode {
    /// Objects must be streamed through the application (local disk)
    Proxied,
    /// Objects have a public URL clients can be redirected to
    PublicUrl,
}

/// Pluggable blob store for card images.
///
/// Keys are relative paths such as `processed/{slug}.png`; backends map
/// them onto a filesystem or an object-store bucket.
#[async_trait]
pub trait MediaStore: Send + Sync + Debug {
    /// Store an object under `key`, overwriting any previous content
    async fn put(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<(), DomainError>;

    /// Fetch an object's contents
    async fn get(&self, key: &str) -> Result<Bytes, DomainError>;

    /// Delete an object, returns true if it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Public URL for an object
    fn url(&self, key: &str) -> String;

    /// How this backend's objects should be served
    fn serving_mode(&self) -> ServingMode;
}

/// Media key for the uploaded original of a card
pub fn original_key(user_id: &str, slug: &str) -> String {
    format!("originals/{}/{}.original", user_id, slug)
}

/// Media key for the processed PNG of a card
pub fn processed_key(slug: &str) -> String {
    format!("processed/{}.png", slug)
}
