//! Media store factory for runtime backend selection

use std::sync::Arc;

use crate::config::{MediaBackend, MediaConfig};
use crate::domain::media::MediaStore;
use crate::domain::DomainError;

use super::local::LocalMediaStore;
use super::s3::{S3MediaConfig, S3MediaStore};

/// Factory for creating the configured media store
#[derive(Debug)]
pub struct MediaFactory;

impl MediaFactory {
    pub async fn create(
        config: &MediaConfig,
        base_url: &str,
    ) -> Result<Arc<dyn MediaStore>, DomainError> {
        match config.backend {
            MediaBackend::Local => Ok(Arc::new(LocalMediaStore::new(
                &config.local_root,
                base_url,
            ))),
            MediaBackend::S3 => {
                let s3_config = S3MediaConfig {
                    bucket: required(&config.bucket, "media.bucket")?,
                    region: config.region.clone().unwrap_or_else(|| "auto".to_string()),
                    endpoint_url: config.endpoint_url.clone(),
                    public_url: required(&config.public_url, "media.public_url")?,
                    access_key_id: config.access_key_id.clone(),
                    secret_access_key: config.secret_access_key.clone(),
                };

                Ok(Arc::new(S3MediaStore::connect(&s3_config).await))
            }
        }
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, DomainError> {
    value.clone().ok_or_else(|| {
        DomainError::configuration(format!("{} is required for the s3 backend", name))
    })
}
