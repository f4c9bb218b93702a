//! Local-filesystem media store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::domain::media::{MediaStore, ServingMode};
use crate::domain::DomainError;

/// Media store backed by a local directory. Objects are served through
/// the application at `{base_url}/uploads/{key}`.
#[derive(Debug)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a key to an on-disk path, rejecting traversal segments
    fn resolve(&self, key: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(key);

        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || traversal {
            return Err(DomainError::media(format!("Invalid media key: '{}'", key)));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<(), DomainError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::media(format!("Failed to create directory: {}", e)))?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| DomainError::media(format!("Failed to write '{}': {}", key, e)))?;

        debug!(key, bytes = data.len(), "Stored media object locally");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
        let path = self.resolve(key)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DomainError::not_found(
                format!("Media object '{}' not found", key),
            )),
            Err(e) => Err(DomainError::media(format!(
                "Failed to read '{}': {}",
                key, e
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let path = self.resolve(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::media(format!(
                "Failed to delete '{}': {}",
                key, e
            ))),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/uploads/{}", self.base_url, key)
    }

    fn serving_mode(&self) -> ServingMode {
        ServingMode::Proxied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (LocalMediaStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("cardlink-media-{}", uuid::Uuid::new_v4()));
        (
            LocalMediaStore::new(&dir, "http://localhost:8080/"),
            dir,
        )
    }

    #[tokio::test]
    async fn test_put_get_delete_roundtrip() {
        let (store, dir) = temp_store();
        let data = Bytes::from_static(b"png-bytes");

        store
            .put("processed/abc.png", data.clone(), "image/png")
            .await
            .unwrap();

        let fetched = store.get("processed/abc.png").await.unwrap();
        assert_eq!(fetched, data);

        assert!(store.delete("processed/abc.png").await.unwrap());
        assert!(!store.delete("processed/abc.png").await.unwrap());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (store, _dir) = temp_store();

        let result = store.get("processed/missing.png").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let (store, _dir) = temp_store();

        let result = store.get("../etc/passwd").await;
        assert!(matches!(result, Err(DomainError::Media { .. })));
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let store = LocalMediaStore::new("/tmp/x", "http://localhost:8080/");
        assert_eq!(
            store.url("processed/abc.png"),
            "http://localhost:8080/uploads/processed/abc.png"
        );
    }
}
