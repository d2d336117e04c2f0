//! Shared types used across the Spyglass engine.
//!
//! This module defines the target taxonomy and the result records that
//! lookup modules produce during a scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel finding value meaning "module ran cleanly but found nothing".
///
/// Findings carrying this value are filtered out by the aggregator before
/// results reach the caller.
pub const NONE_FOUND: &str = "None found";

/// The kind of thing a scan is performed against.
///
/// The enum is closed: every lookup module declares which of these it can
/// handle, and the classifier resolves raw input to exactly one of them.
/// Variant order matches classification precedence and is not meaningful
/// for sorting output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// IPv4 or IPv6 address
    Ip,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Platform username or handle
    Username,
    /// Physical address
    Address,
    /// Password or file hash
    Hash,
    /// Domain name
    Domain,
    /// WiFi network (BSSID and/or SSID)
    Wifi,
    /// Person name
    Name,
}

impl TargetType {
    /// All target types, in classification precedence order.
    pub const ALL: [TargetType; 9] = [
        Self::Ip,
        Self::Email,
        Self::Phone,
        Self::Username,
        Self::Address,
        Self::Hash,
        Self::Domain,
        Self::Wifi,
        Self::Name,
    ];

    /// The wire/DSL name of this type (`"IP"`, `"EMAIL"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Username => "USERNAME",
            Self::Address => "ADDRESS",
            Self::Hash => "HASH",
            Self::Domain => "DOMAIN",
            Self::Wifi => "WIFI",
            Self::Name => "NAME",
        }
    }

    /// Get a human-readable display name for the target type.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ip => "IP Address",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Username => "Username",
            Self::Address => "Physical Address",
            Self::Hash => "Hash",
            Self::Domain => "Domain",
            Self::Wifi => "WiFi Network",
            Self::Name => "Person Name",
        }
    }

    /// An explicit-prefix query example for this type.
    ///
    /// Shown to the user when classification is ambiguous, so the message
    /// enumerates one actionable form per type.
    #[must_use]
    pub fn prefix_example(&self) -> &'static str {
        match self {
            Self::Ip => "ip:1.1.1.1",
            Self::Email => "email:test@test.com",
            Self::Phone => "phone:+14155551234",
            Self::Username => "user:admin",
            Self::Address => "addr:\"221B Baker Street\"",
            Self::Hash => "hash:5f4dcc3b5aa765d61d8327deb882cf99",
            Self::Domain => "domain:example.com",
            Self::Wifi => "bssid:AA:BB:CC:DD:EE:FF",
            Self::Name => "name:\"John Doe\"",
        }
    }

    /// Parse a wire/DSL name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk tier assigned to a finding by the module that produced it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Informational, no direct exposure
    #[default]
    Low,
    /// Worth attention
    Medium,
    /// Direct exposure of sensitive data
    High,
    /// Active compromise indicators
    Critical,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// One reportable fact returned by a lookup module about a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Short label for the fact (e.g. "Data Breaches")
    pub label: String,
    /// The fact itself
    pub value: String,
    /// Module name or sub-source that produced the fact
    pub source: String,
    /// Optional sub-category within the source
    pub group: Option<String>,
    /// Risk tier assigned by the module
    pub risk: RiskTier,
}

impl Finding {
    /// Create a finding with default (low) risk and no group.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            source: source.into(),
            group: None,
            risk: RiskTier::Low,
        }
    }

    /// Set the risk tier.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskTier) -> Self {
        self.risk = risk;
        self
    }

    /// Set the sub-category group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Whether this finding is the "ran cleanly, nothing to report" sentinel.
    #[must_use]
    pub fn is_none_found(&self) -> bool {
        self.value == NONE_FOUND
    }
}

/// Terminal status of one module invocation within a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Module completed and returned findings (possibly the clean sentinel)
    Ok,
    /// Module execution failed; siblings were unaffected
    Error,
    /// Module exceeded its time budget
    Timeout,
    /// Module was not eligible to run for this target
    Skipped,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

/// Result of one module invocation within a scan.
///
/// `error_detail` is `Some` exactly when `status` is not [`OutcomeStatus::Ok`];
/// the constructors enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleOutcome {
    /// Name of the module that produced this outcome
    pub module_name: String,
    /// Terminal status of the invocation
    pub status: OutcomeStatus,
    /// Findings produced by the module (may include synthetic entries)
    pub findings: Vec<Finding>,
    /// Human-readable detail, present iff status is not Ok
    pub error_detail: Option<String>,
}

impl ModuleOutcome {
    /// Successful outcome with the module's findings.
    #[must_use]
    pub fn ok(module_name: impl Into<String>, findings: Vec<Finding>) -> Self {
        Self {
            module_name: module_name.into(),
            status: OutcomeStatus::Ok,
            findings,
            error_detail: None,
        }
    }

    /// Failed outcome; the error is isolated to this module.
    #[must_use]
    pub fn error(module_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            status: OutcomeStatus::Error,
            findings: Vec::new(),
            error_detail: Some(detail.into()),
        }
    }

    /// Timed-out outcome carrying a synthetic timeout finding.
    #[must_use]
    pub fn timeout(module_name: impl Into<String>, budget_secs: u64) -> Self {
        let module_name = module_name.into();
        let finding = Finding::new(
            "Timeout",
            format!("No response within {budget_secs}s"),
            module_name.clone(),
        )
        .with_risk(RiskTier::Medium);

        Self {
            module_name,
            status: OutcomeStatus::Timeout,
            findings: vec![finding],
            error_detail: Some(format!("exceeded {budget_secs}s budget")),
        }
    }

    /// Skipped outcome with a human-readable reason (e.g. "set wigle API key").
    #[must_use]
    pub fn skipped(module_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            status: OutcomeStatus::Skipped,
            findings: Vec::new(),
            error_detail: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_wire_names() {
        assert_eq!(TargetType::Ip.as_str(), "IP");
        assert_eq!(TargetType::Wifi.as_str(), "WIFI");
        assert_eq!(TargetType::Email.to_string(), "EMAIL");
    }

    #[test]
    fn test_target_type_parse() {
        assert_eq!(TargetType::parse("email"), Some(TargetType::Email));
        assert_eq!(TargetType::parse(" WIFI "), Some(TargetType::Wifi));
        assert_eq!(TargetType::parse("bogus"), None);
    }

    #[test]
    fn test_target_type_serde() {
        let json = serde_json::to_string(&TargetType::Username).expect("serialize target type");
        assert_eq!(json, "\"USERNAME\"");

        let back: TargetType = serde_json::from_str(&json).expect("deserialize target type");
        assert_eq!(back, TargetType::Username);
    }

    #[test]
    fn test_prefix_examples_cover_all_types() {
        for ty in TargetType::ALL {
            assert!(
                ty.prefix_example().contains(':'),
                "prefix example for {ty} must be a field:value form"
            );
        }
    }

    #[test]
    fn test_risk_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::High < RiskTier::Critical);
    }

    #[test]
    fn test_finding_sentinel() {
        let clean = Finding::new("Breaches", NONE_FOUND, "hibp");
        assert!(clean.is_none_found());

        let real = Finding::new("Breaches", "Found in 3 breaches", "hibp");
        assert!(!real.is_none_found());
    }

    #[test]
    fn test_finding_builder() {
        let finding = Finding::new("City", "Reykjavik", "ipinfo")
            .with_group("Geolocation")
            .with_risk(RiskTier::Medium);
        assert_eq!(finding.group.as_deref(), Some("Geolocation"));
        assert_eq!(finding.risk, RiskTier::Medium);
    }

    #[test]
    fn test_outcome_error_detail_invariant() {
        let ok = ModuleOutcome::ok("ipinfo", vec![]);
        assert!(ok.error_detail.is_none());

        let err = ModuleOutcome::error("ipinfo", "connection refused");
        assert_eq!(err.status, OutcomeStatus::Error);
        assert!(err.error_detail.is_some());

        let skipped = ModuleOutcome::skipped("wigle", "set wigle API key");
        assert_eq!(skipped.status, OutcomeStatus::Skipped);
        assert!(skipped.findings.is_empty());
    }

    #[test]
    fn test_timeout_outcome_carries_synthetic_finding() {
        let outcome = ModuleOutcome::timeout("slowpoke", 25);
        assert_eq!(outcome.status, OutcomeStatus::Timeout);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].label, "Timeout");
        assert_eq!(outcome.findings[0].risk, RiskTier::Medium);
    }
}
