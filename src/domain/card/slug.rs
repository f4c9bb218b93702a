//! Card slug generation
//!
//! Slugs are the public identity of a card (`/c/{slug}`), so they are
//! sampled from a URL-safe alphabet with enough entropy to make
//! enumeration impractical (64^21 possibilities).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// URL-safe slug alphabet (base64url character set)
const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Length of generated slugs
pub const SLUG_LEN: usize = 21;

/// URL-safe random card slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Generate a fresh random slug
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let slug = (0..SLUG_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        Self(slug)
    }

    /// Wrap an existing slug value (path parameters, stored records)
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_length() {
        assert_eq!(Slug::generate().as_str().len(), SLUG_LEN);
    }

    #[test]
    fn test_slug_alphabet() {
        let slug = Slug::generate();
        assert!(slug
            .as_str()
            .bytes()
            .all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_slug_uniqueness() {
        let a = Slug::generate();
        let b = Slug::generate();
        assert_ne!(a, b);
    }
}
