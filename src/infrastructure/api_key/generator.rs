//! API key generation
//!
//! Generates cryptographically secure API keys, hashed for storage.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random characters included in a key's unique prefix
const PREFIX_RANDOM_CHARS: usize = 8;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once at creation)
    pub key: String,
    /// The unique key prefix for identification
    pub prefix: String,
    /// The hashed key for storage
    pub hash: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Type prefix for all generated keys (e.g. "ck_live_")
    prefix: String,
    /// Number of random bytes per key
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
        }
    }

    /// Generate a new API key
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        let key = format!("{}{}", self.prefix, encoded);
        let prefix = format!(
            "{}{}",
            self.prefix,
            &encoded[..PREFIX_RANDOM_CHARS.min(encoded.len())]
        );

        let hash = self.hash_key(&key);

        GeneratedApiKey { key, prefix, hash }
    }

    /// Hash an API key for storage
    pub fn hash_key(&self, key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        format!("sha256${}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }

    /// Verify an API key against a stored hash
    pub fn verify_key(&self, key: &str, stored_hash: &str) -> bool {
        constant_time_compare(&self.hash_key(key), stored_hash)
    }

    /// Extract the unique prefix from a presented key: the type prefix
    /// up to its final underscore plus the first random characters.
    pub fn extract_prefix(key: &str) -> Option<&str> {
        let type_prefix_end = key.rfind('_')? + 1;
        let prefix_end = (type_prefix_end + PREFIX_RANDOM_CHARS).min(key.len());

        Some(&key[..prefix_end])
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
