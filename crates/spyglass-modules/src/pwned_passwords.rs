//! Pwned Passwords hash lookup via the HIBP range API.

use async_trait::async_trait;
use spyglass_core::{classify, Finding, RiskTier, TargetType, NONE_FOUND};
use spyglass_plugin::http::send_with_retry;
use spyglass_plugin::{
    LookupModule, ModuleContext, ModuleDescriptor, ModuleError, ModuleResult,
};

const BASE_URL: &str = "https://api.pwnedpasswords.com/range";

/// Password hash breach lookup using the k-anonymity range API.
///
/// Free, no key. Only the first five hex characters of the hash leave
/// the machine; the matching suffix is searched locally in the returned
/// range. The range API indexes SHA-1 digests, so only SHA-1-shaped
/// targets are queried; other hash kinds get an identification finding.
pub struct PwnedPasswordsModule {
    descriptor: ModuleDescriptor,
}

impl PwnedPasswordsModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(
                "pwned_passwords",
                "Pwned Passwords",
                "hash_lookup",
            )
            .with_description("Check password hashes against breached-password corpora")
            .with_free_types([TargetType::Hash])
            .with_rate_limit(100)
            .with_timeout_secs(15),
        }
    }

    /// Find the occurrence count for a hash suffix in a range response.
    ///
    /// The body is one `SUFFIX:COUNT` pair per line.
    fn find_suffix(body: &str, suffix: &str) -> Option<u64> {
        body.lines().find_map(|line| {
            let (candidate, count) = line.trim().split_once(':')?;
            if candidate.eq_ignore_ascii_case(suffix) {
                count.trim().parse().ok()
            } else {
                None
            }
        })
    }

    fn risk_note(count: u64) -> Finding {
        let (value, risk) = if count > 1_000_000 {
            ("Extremely common password", RiskTier::Critical)
        } else if count > 100_000 {
            ("Very common password", RiskTier::High)
        } else if count > 1_000 {
            ("Common password", RiskTier::Medium)
        } else {
            ("Less common but still exposed", RiskTier::Medium)
        };
        Finding::new("Risk Level", value, "pwned_passwords").with_risk(risk)
    }
}

impl Default for PwnedPasswordsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for PwnedPasswordsModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let source = "pwned_passwords";
        let hash = target.trim();

        let mut findings = Vec::new();

        if let Some(kind) = classify::hash_kind(hash) {
            findings.push(Finding::new("Hash Type", kind.label(), source));
        }

        // The range API only answers for SHA-1 digests
        if hash.len() != 40 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            findings.push(Finding::new(
                "Password Breach",
                "Only SHA-1 hashes can be checked against the range API",
                source,
            ));
            return Ok(findings);
        }

        let upper = hash.to_ascii_uppercase();
        let (prefix, suffix) = upper.split_at(5);

        let response = send_with_retry(ctx.http.get(format!("{BASE_URL}/{prefix}"))).await?;

        if !response.status().is_success() {
            return Err(ModuleError::UnexpectedStatus {
                status: response.status().as_u16(),
                service: source.to_string(),
            });
        }

        let body = response.text().await?;

        if let Some(count) = Self::find_suffix(&body, suffix) {
            findings.push(
                Finding::new(
                    "Password Breach",
                    format!("PWNED - found {count} times in breaches"),
                    source,
                )
                .with_risk(RiskTier::Critical),
            );
            findings.push(Self::risk_note(count));
        } else {
            findings.push(Finding::new("Password Breach", NONE_FOUND, source));
        }

        Ok(findings)
    }
}
