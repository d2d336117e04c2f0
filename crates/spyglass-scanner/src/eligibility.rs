//! Module eligibility gating.
//!
//! A module runs when the target type is in its free partition, or in
//! its key-gated partition with every required credential present. An
//! ineligible module is reported as skipped with a reason a user can
//! act on, never silently dropped.

use spyglass_core::{CredentialStore, TargetType};
use spyglass_plugin::ModuleDescriptor;

/// Outcome of the eligibility check for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The module may run
    Eligible,
    /// The module must not run; the reason is user-actionable
    Skip {
        /// Why the module was skipped
        reason: String,
    },
}

/// Decide whether a module may run against a target type.
#[must_use]
pub fn check(
    descriptor: &ModuleDescriptor,
    target_type: TargetType,
    credentials: &dyn CredentialStore,
) -> Eligibility {
    if !descriptor.supports(target_type) {
        return Eligibility::Skip {
            reason: format!("does not handle {} targets", target_type.display_name()),
        };
    }

    if !descriptor.is_key_gated_for(target_type) {
        return Eligibility::Eligible;
    }

    let missing: Vec<&str> = descriptor
        .required_keys()
        .into_iter()
        .filter(|key| !credentials.has(key))
        .collect();

    if missing.is_empty() {
        Eligibility::Eligible
    } else {
        Eligibility::Skip {
            reason: format!("set {} API key", missing.join(", ")),
        }
    }
}
