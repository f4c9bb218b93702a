//! S3-compatible media store
//!
//! Works against AWS S3 proper and S3-compatible stores such as
//! Cloudflare R2 via a custom endpoint URL. Objects are expected to be
//! publicly readable under the configured public URL.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use crate::domain::media::{MediaStore, ServingMode};
use crate::domain::DomainError;

/// Configuration for the S3 media store
#[derive(Debug, Clone)]
pub struct S3MediaConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for R2 and other S3-compatible stores
    pub endpoint_url: Option<String>,
    /// Public URL prefix the bucket is served from
    pub public_url: String,
    /// Static credentials; falls back to the ambient AWS credential
    /// chain when absent
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Media store backed by an S3-compatible bucket
#[derive(Debug)]
pub struct S3MediaStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3MediaStore {
    pub async fn connect(config: &S3MediaConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key), Some(secret)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "cardlink-config",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);

        if let Some(endpoint) = &config.endpoint_url {
            // R2 and minio require path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), DomainError> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| DomainError::media(format!("Failed to upload '{}': {}", key, e)))?;

        debug!(key, bytes = size, "Uploaded media object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    DomainError::not_found(format!("Media object '{}' not found", key))
                } else {
                    DomainError::media(format!("Failed to download '{}': {}", key, service_error))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| DomainError::media(format!("Failed to read body of '{}': {}", key, e)))?;

        Ok(data.into_bytes())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DomainError::media(format!("Failed to delete '{}': {}", key, e)))?;

        // S3 DeleteObject does not distinguish missing keys
        Ok(true)
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    fn serving_mode(&self) -> ServingMode {
        ServingMode::PublicUrl
    }
}
