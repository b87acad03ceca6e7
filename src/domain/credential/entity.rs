//! Credential mapping types

use std::collections::BTreeMap;

/// Reserved identity seeded at startup with the configured bootstrap key
pub const DEFAULT_IDENTITY: &str = "default";

/// Identity (email) to API key mapping.
///
/// Ordered so that persisted snapshots are deterministic.
pub type CredentialMap = BTreeMap<String, String>;

/// Short, log-safe prefix of a key
pub fn key_prefix(key: &str) -> String {
    key.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix("0123456789abcdef"), "01234567");
        assert_eq!(key_prefix("abc"), "abc");
        assert_eq!(key_prefix(""), "");
    }
}
