//! API key generation
//!
//! Generates cryptographically secure, hex-encoded bearer keys.

use rand::RngCore;

/// Generator for bearer API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Number of random bytes to generate
    key_bytes: usize,
}

impl ApiKeyGenerator {
    /// Default number of random bytes, 32 hex characters once encoded
    pub const DEFAULT_KEY_BYTES: usize = 16;

    pub fn new() -> Self {
        Self {
            key_bytes: Self::DEFAULT_KEY_BYTES,
        }
    }

    /// Generate a new key
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        hex::encode(random_bytes)
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
