//! Credential store boundary.
//!
//! Modules never read API keys themselves; the orchestrator injects a
//! [`CredentialStore`] and eligibility gating consults it. Stores only
//! answer lookups; persistence and encryption live behind the trait.

use std::collections::HashMap;

/// Read-only source of API credentials, keyed by service name.
pub trait CredentialStore: Send + Sync {
    /// Look up the credential for a service key (e.g. `"hibp"`).
    ///
    /// Returns `None` when the key is unknown or empty.
    fn get(&self, key_name: &str) -> Option<String>;

    /// Whether a non-empty credential exists for the key.
    fn has(&self, key_name: &str) -> bool {
        self.get(key_name).is_some_and(|v| !v.trim().is_empty())
    }
}

/// Credential store backed by process environment variables.
///
/// A service key `hibp` resolves to the variable `SPYGLASS_HIBP_API_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    /// Environment variable name for a service key.
    #[must_use]
    pub fn var_name(key_name: &str) -> String {
        let upper: String = key_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("SPYGLASS_{upper}_API_KEY")
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get(&self, key_name: &str) -> Option<String> {
        std::env::var(Self::var_name(key_name))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// In-memory credential store for tests and config-provided keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    keys: HashMap<String, String>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a credential, returning self for chaining.
    #[must_use]
    pub fn with_key(mut self, key_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(key_name.into(), value.into());
        self
    }

    /// Insert or replace a credential.
    pub fn set(&mut self, key_name: impl Into<String>, value: impl Into<String>) {
        self.keys.insert(key_name.into(), value.into());
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key_name: &str) -> Option<String> {
        self.keys
            .get(key_name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name_mapping() {
        assert_eq!(EnvCredentialStore::var_name("hibp"), "SPYGLASS_HIBP_API_KEY");
        assert_eq!(
            EnvCredentialStore::var_name("wigle-name"),
            "SPYGLASS_WIGLE_NAME_API_KEY"
        );
    }

    #[test]
    fn test_memory_store_lookup() {
        let store = MemoryCredentialStore::new().with_key("hibp", "secret123");
        assert_eq!(store.get("hibp").as_deref(), Some("secret123"));
        assert!(store.has("hibp"));
        assert!(store.get("wigle").is_none());
        assert!(!store.has("wigle"));
    }

    #[test]
    fn test_empty_value_counts_as_absent() {
        let store = MemoryCredentialStore::new().with_key("hibp", "   ");
        assert!(store.get("hibp").is_none());
        assert!(!store.has("hibp"));
    }
}
