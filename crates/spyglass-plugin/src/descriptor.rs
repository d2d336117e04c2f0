//! Module descriptors.
//!
//! A descriptor is the static metadata a lookup module registers under:
//! identity, the target types it handles, and the credentials it needs.
//! Descriptors are validated once at registration; invalid ones are
//! rejected and never reach the registry.

use crate::error::{ModuleError, ModuleResult};
use serde::{Deserialize, Serialize};
use spyglass_core::TargetType;

/// An API credential a module needs (or can optionally use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequirement {
    /// Service key the credential is stored under (e.g. `"hibp"`)
    pub key_name: String,
    /// Human-readable name for settings screens
    pub display_name: String,
    /// Where to sign up for the key
    pub signup_url: String,
    /// Whether the module is unusable without it
    pub is_required: bool,
}

impl CredentialRequirement {
    /// Create a required credential.
    #[must_use]
    pub fn required(
        key_name: impl Into<String>,
        display_name: impl Into<String>,
        signup_url: impl Into<String>,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            display_name: display_name.into(),
            signup_url: signup_url.into(),
            is_required: true,
        }
    }

    /// Create an optional credential (module runs without it, degraded).
    #[must_use]
    pub fn optional(
        key_name: impl Into<String>,
        display_name: impl Into<String>,
        signup_url: impl Into<String>,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            display_name: display_name.into(),
            signup_url: signup_url.into(),
            is_required: false,
        }
    }
}

/// Static metadata describing a lookup module.
///
/// The target types a module declares are partitioned into `free_types`
/// (run with no credentials) and `key_gated_types` (run only when every
/// required credential is present). The partitions must be disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique registry key
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// One-line description of what the module looks up
    pub description: String,
    /// Grouping for settings/reporting (e.g. "breach_detection")
    pub category: String,
    /// Target types handled without credentials
    pub free_types: Vec<TargetType>,
    /// Target types handled only with credentials present
    pub key_gated_types: Vec<TargetType>,
    /// Credentials the module uses
    pub credentials: Vec<CredentialRequirement>,
    /// Advisory service rate limit, requests per minute
    pub rate_limit_per_minute: Option<u32>,
    /// Per-invocation time budget; the orchestrator applies its floor
    pub timeout_secs: Option<u64>,
}

impl ModuleDescriptor {
    /// Create a descriptor with empty type partitions.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            category: category.into(),
            free_types: Vec::new(),
            key_gated_types: Vec::new(),
            credentials: Vec::new(),
            rate_limit_per_minute: None,
            timeout_secs: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add target types handled without credentials.
    #[must_use]
    pub fn with_free_types(mut self, types: impl IntoIterator<Item = TargetType>) -> Self {
        self.free_types.extend(types);
        self
    }

    /// Add target types handled only with credentials.
    #[must_use]
    pub fn with_key_gated_types(mut self, types: impl IntoIterator<Item = TargetType>) -> Self {
        self.key_gated_types.extend(types);
        self
    }

    /// Add a credential requirement.
    #[must_use]
    pub fn with_credential(mut self, credential: CredentialRequirement) -> Self {
        self.credentials.push(credential);
        self
    }

    /// Set the advisory rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        self.rate_limit_per_minute = Some(per_minute);
        self
    }

    /// Set the per-invocation time budget.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Whether the module handles this target type at all.
    #[must_use]
    pub fn supports(&self, target_type: TargetType) -> bool {
        self.free_types.contains(&target_type) || self.key_gated_types.contains(&target_type)
    }

    /// Whether this target type requires credentials for this module.
    #[must_use]
    pub fn is_key_gated_for(&self, target_type: TargetType) -> bool {
        self.key_gated_types.contains(&target_type)
    }

    /// Required credential keys (the ones gating eligibility).
    #[must_use]
    pub fn required_keys(&self) -> Vec<&str> {
        self.credentials
            .iter()
            .filter(|c| c.is_required)
            .map(|c| c.key_name.as_str())
            .collect()
    }

    /// Validate the descriptor.
    ///
    /// # Errors
    /// Rejects an empty name, a module declaring no types, and any type
    /// appearing in both the free and key-gated partitions.
    pub fn validate(&self) -> ModuleResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModuleError::InvalidDescriptor {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }

        if self.free_types.is_empty() && self.key_gated_types.is_empty() {
            return Err(ModuleError::InvalidDescriptor {
                name: self.name.clone(),
                reason: "module declares no target types".to_string(),
            });
        }

        for ty in &self.free_types {
            if self.key_gated_types.contains(ty) {
                return Err(ModuleError::InvalidDescriptor {
                    name: self.name.clone(),
                    reason: format!("target type {ty} is both free and key-gated"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ModuleDescriptor::new("hibp", "Have I Been Pwned", "breach_detection")
            .with_description("Breach and paste lookups")
            .with_key_gated_types([TargetType::Email, TargetType::Domain])
            .with_credential(CredentialRequirement::required(
                "hibp",
                "HIBP API Key",
                "https://haveibeenpwned.com/API/Key",
            ))
            .with_rate_limit(10)
            .with_timeout_secs(30);

        assert!(descriptor.validate().is_ok());
        assert!(descriptor.supports(TargetType::Email));
        assert!(descriptor.is_key_gated_for(TargetType::Email));
        assert!(!descriptor.supports(TargetType::Ip));
        assert_eq!(descriptor.required_keys(), vec!["hibp"]);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let descriptor =
            ModuleDescriptor::new("  ", "X", "misc").with_free_types([TargetType::Ip]);
        let err = descriptor.validate().expect_err("empty name must fail");
        assert!(matches!(err, ModuleError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_validate_rejects_no_types() {
        let descriptor = ModuleDescriptor::new("empty", "Empty", "misc");
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlapping_partitions() {
        let descriptor = ModuleDescriptor::new("overlap", "Overlap", "misc")
            .with_free_types([TargetType::Email])
            .with_key_gated_types([TargetType::Email, TargetType::Domain]);

        let err = descriptor.validate().expect_err("overlap must fail");
        assert!(err.to_string().contains("both free and key-gated"));
    }

    #[test]
    fn test_optional_credential_not_in_required_keys() {
        let descriptor = ModuleDescriptor::new("ipinfo", "IPinfo", "ip_intelligence")
            .with_free_types([TargetType::Ip])
            .with_credential(CredentialRequirement::optional(
                "ipinfo",
                "IPinfo Token",
                "https://ipinfo.io/signup",
            ));

        assert!(descriptor.validate().is_ok());
        assert!(descriptor.required_keys().is_empty());
    }
}
