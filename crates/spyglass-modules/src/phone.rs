//! Offline phone number analysis.

use async_trait::async_trait;
use spyglass_core::{extract_metadata, Finding, RiskTier, TargetMetadata, TargetType, NONE_FOUND};
use spyglass_plugin::{LookupModule, ModuleContext, ModuleDescriptor, ModuleResult};

/// Local phone number analysis: normalization, E.164 form, country guess.
///
/// Runs entirely offline; no network I/O and no credentials.
pub struct PhoneModule {
    descriptor: ModuleDescriptor,
}

impl PhoneModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("phone", "Phone Analyzer", "phone_intelligence")
                .with_description("Offline phone number normalization and analysis")
                .with_free_types([TargetType::Phone])
                .with_rate_limit(1000)
                .with_timeout_secs(10),
        }
    }
}

impl Default for PhoneModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for PhoneModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        _ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let source = "phone";

        let TargetMetadata::Phone {
            digits,
            e164,
            country,
        } = extract_metadata(target, TargetType::Phone)
        else {
            return Ok(vec![Finding::new("Phone Analysis", NONE_FOUND, source)]);
        };

        let mut findings = Vec::new();

        if digits.len() < 10 {
            findings.push(
                Finding::new("Validation", "Fewer than 10 digits", source)
                    .with_risk(RiskTier::Medium),
            );
            return Ok(findings);
        }

        findings.push(Finding::new("Digits", digits.clone(), source));

        if let Some(e164) = e164 {
            findings.push(Finding::new("E.164", e164, source));
        } else {
            findings.push(Finding::new(
                "Format Note",
                "No country prefix; prepend + and a calling code for region analysis",
                source,
            ));
        }

        if let Some(country) = country {
            findings.push(Finding::new("Country", country, source));
        }

        Ok(findings)
    }
}
