//! Structured query parsing.
//!
//! Supports both simple targets (`user@example.com`, `8.8.8.8`) and
//! structured `field:"value"` queries (`email:"a@b.com" name:"John Doe"`).
//! Parsing never aborts on a bad field; problems are collected into
//! [`ParsedQuery::errors`] so the caller can show all of them at once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use spyglass_core::classify;
use spyglass_core::TargetType;
use std::fmt;

/// `field:"double"`, `field:'single'`, or `field:bareword` capture.
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+):\s*(?:"([^"]+)"|'([^']+)'|(\S+))"#).expect("valid regex")
});

static BSSID_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f]{2}-){5}[0-9A-Fa-f]{2}$").expect("valid regex"));

/// Type resolution priority when a structured query mixes field types.
///
/// The first type present among the parsed fields wins and drives the
/// primary-target choice; the remaining fields ride along as context.
const TYPE_PRIORITY: [TargetType; 9] = [
    TargetType::Email,
    TargetType::Ip,
    TargetType::Phone,
    TargetType::Wifi,
    TargetType::Username,
    TargetType::Address,
    TargetType::Hash,
    TargetType::Domain,
    TargetType::Name,
];

/// Whether a query was a bare target or a `field:value` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// A bare target resolved through the classifier
    Simple,
    /// One or more `field:"value"` pairs
    Structured,
}

/// A parsed query with its resolved type and extracted fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// The query as entered, trimmed
    pub raw: String,
    /// Simple or structured
    pub kind: QueryKind,
    /// The single winning target type, if resolution succeeded
    pub resolved_type: Option<TargetType>,
    /// The value scans run against
    pub primary_target: String,
    /// Field/value pairs in appearance order (structured queries only);
    /// keys are lowercased, duplicate keys keep the last value
    pub fields: Vec<(String, String)>,
    /// Collected problems; empty for a clean parse
    pub errors: Vec<String>,
}

impl ParsedQuery {
    /// Whether the query parsed cleanly and resolved to a type.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.resolved_type.is_some()
    }

    /// Look up a field value by its (lowercase) name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self
            .resolved_type
            .map_or("unresolved", |t| t.as_str());
        match self.kind {
            QueryKind::Simple => {
                write!(f, "{type_name}: {}", self.primary_target)
            }
            QueryKind::Structured => {
                let pairs: Vec<String> = self
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{k}:\"{v}\""))
                    .collect();
                write!(f, "{} ({type_name})", pairs.join(" "))
            }
        }
    }
}

/// Parser for the Spyglass query syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a query string into a [`ParsedQuery`].
    ///
    /// Never fails; problems land in the result's `errors`.
    #[must_use]
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let query = query.trim();

        if query.is_empty() {
            return ParsedQuery {
                raw: String::new(),
                kind: QueryKind::Simple,
                resolved_type: None,
                primary_target: String::new(),
                fields: Vec::new(),
                errors: vec!["Empty query".to_string()],
            };
        }

        if Self::is_structured(query) {
            Self::parse_structured(query)
        } else {
            Self::parse_simple(query)
        }
    }

    /// Extract BSSID and SSID components from a WiFi query.
    ///
    /// Handles structured `bssid:`/`ssid:` fields, simple `BSSID|SSID`
    /// composites, simple bare BSSIDs, and bare SSIDs. BSSIDs come back
    /// normalized to uppercase colon-separated form.
    #[must_use]
    pub fn wifi_components(&self, parsed: &ParsedQuery) -> (Option<String>, Option<String>) {
        match parsed.kind {
            QueryKind::Structured => {
                let bssid = parsed
                    .field("bssid")
                    .or_else(|| parsed.field("mac"))
                    .or_else(|| parsed.field("wifi"))
                    .map(classify::normalize_bssid);
                let ssid = parsed.field("ssid").map(str::to_string);
                (bssid, ssid)
            }
            QueryKind::Simple => {
                if parsed.resolved_type == Some(TargetType::Wifi) {
                    classify::split_wifi_target(&parsed.primary_target)
                } else {
                    (None, None)
                }
            }
        }
    }

    /// Whether the query uses `field:value` syntax.
    ///
    /// BSSIDs contain colons and would mis-parse as field pairs, so the
    /// three BSSID shapes are ruled out before the field pattern runs.
    /// At least one field name must be a recognized alias; a lone
    /// unrecognized token (`https://...`) stays a simple query.
    fn is_structured(query: &str) -> bool {
        if classify::is_bssid(query) || BSSID_DASH_RE.is_match(query) {
            return false;
        }

        if let Some((head, _)) = query.split_once('|') {
            if classify::is_bssid(head.trim()) {
                return false;
            }
        }

        FIELD_RE
            .captures_iter(query)
            .filter_map(|caps| caps.get(1))
            .any(|name| field_target_type(&name.as_str().to_lowercase()).is_some())
    }

    fn parse_simple(query: &str) -> ParsedQuery {
        let resolved_type = classify::classify(query);
        let errors = if resolved_type.is_none() {
            vec![format!("Could not determine query type for: {query}")]
        } else {
            Vec::new()
        };

        ParsedQuery {
            raw: query.to_string(),
            kind: QueryKind::Simple,
            resolved_type,
            primary_target: query.to_string(),
            fields: Vec::new(),
            errors,
        }
    }

    fn parse_structured(query: &str) -> ParsedQuery {
        let mut result = ParsedQuery {
            raw: query.to_string(),
            kind: QueryKind::Structured,
            resolved_type: None,
            primary_target: String::new(),
            fields: Vec::new(),
            errors: Vec::new(),
        };

        let mut types_found: Vec<TargetType> = Vec::new();

        for caps in FIELD_RE.captures_iter(query) {
            let field_name = caps[1].to_lowercase();
            // Value is double-quoted, single-quoted, or a bareword
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());

            let Some(target_type) = field_target_type(&field_name) else {
                result.errors.push(format!("Unknown field: {field_name}"));
                continue;
            };

            if !types_found.contains(&target_type) {
                types_found.push(target_type);
            }

            // Duplicate field names keep the last value
            if let Some(slot) = result.fields.iter_mut().find(|(k, _)| *k == field_name) {
                slot.1 = value.to_string();
            } else {
                result.fields.push((field_name.clone(), value.to_string()));
            }

            if !validate_field(canonical_field(&field_name), value) {
                result
                    .errors
                    .push(format!("Invalid format for {field_name}: {value}"));
            }
        }

        if result.fields.is_empty() && result.errors.is_empty() {
            result.errors.push("No valid field:value pairs found".to_string());
            return result;
        }

        result.resolved_type = TYPE_PRIORITY
            .iter()
            .copied()
            .find(|t| types_found.contains(t));

        if result.resolved_type.is_some() {
            result.primary_target = primary_target(&result);
        }

        result
    }
}

/// Map a field alias to its target type.
fn field_target_type(field_name: &str) -> Option<TargetType> {
    let ty = match field_name {
        "email" | "mail" | "e-mail" => TargetType::Email,
        "ip" | "ipv4" | "ipv6" => TargetType::Ip,
        "address" | "addr" | "location" => TargetType::Address,
        "phone" | "tel" | "mobile" => TargetType::Phone,
        "username" | "user" | "handle" => TargetType::Username,
        "hash" | "password" | "pwd" => TargetType::Hash,
        "domain" => TargetType::Domain,
        "bssid" | "ssid" | "wifi" | "mac" => TargetType::Wifi,
        "name" => TargetType::Name,
        _ => return None,
    };
    Some(ty)
}

/// Collapse a field alias to the canonical name its validator is keyed by.
fn canonical_field(field_name: &str) -> &str {
    match field_name {
        "mail" | "e-mail" => "email",
        "ipv4" | "ipv6" => "ip",
        "addr" | "location" => "address",
        "tel" | "mobile" => "phone",
        "user" | "handle" => "username",
        "password" | "pwd" => "hash",
        "wifi" | "mac" => "bssid",
        other => other,
    }
}

/// Validate a field value against its canonical field's format.
///
/// Fields without a validator (ssid, name, address, username) always pass.
fn validate_field(canonical: &str, value: &str) -> bool {
    match canonical {
        "email" => classify::is_email(value),
        "ip" => classify::is_ip_address(value),
        "phone" => classify::is_phone_number(value),
        "bssid" => classify::is_bssid(value),
        "domain" => classify::is_domain(value),
        "hash" => is_hash_value(value),
        _ => true,
    }
}

fn is_hash_value(value: &str) -> bool {
    let hex_len_ok = (32..=128).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_hexdigit());
    hex_len_ok || classify::hash_kind(value).is_some()
}

/// Primary-field priority per target type (first present field wins).
fn primary_target(parsed: &ParsedQuery) -> String {
    let candidates: &[&str] = match parsed.resolved_type {
        Some(TargetType::Email) => &["email", "mail", "e-mail"],
        Some(TargetType::Ip) => &["ip", "ipv4", "ipv6"],
        Some(TargetType::Phone) => &["phone", "tel", "mobile"],
        Some(TargetType::Username) => &["username", "user", "handle"],
        Some(TargetType::Address) => &["address", "addr", "location"],
        Some(TargetType::Hash) => &["hash", "password", "pwd"],
        Some(TargetType::Domain) => &["domain"],
        Some(TargetType::Wifi) => &["bssid", "ssid", "wifi", "mac"],
        Some(TargetType::Name) => &["name"],
        None => &[],
    };

    for candidate in candidates {
        if let Some(value) = parsed.field(candidate) {
            return value.to_string();
        }
    }

    // Fallback: first field value in appearance order
    parsed
        .fields
        .first()
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(q: &str) -> ParsedQuery {
        QueryParser::new().parse(q)
    }

    #[test]
    fn test_empty_query() {
        let parsed = parse("");
        assert!(!parsed.is_valid());
        assert_eq!(parsed.errors, vec!["Empty query"]);
    }

    #[test]
    fn test_simple_email() {
        let parsed = parse("user@example.com");
        assert_eq!(parsed.kind, QueryKind::Simple);
        assert_eq!(parsed.resolved_type, Some(TargetType::Email));
        assert_eq!(parsed.primary_target, "user@example.com");
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_simple_unrecognized() {
        let parsed = parse("??");
        assert!(!parsed.is_valid());
        assert!(parsed.errors[0].starts_with("Could not determine query type"));
    }

    #[test]
    fn test_structured_single_field() {
        let parsed = parse(r#"email:"user@example.com""#);
        assert_eq!(parsed.kind, QueryKind::Structured);
        assert_eq!(parsed.resolved_type, Some(TargetType::Email));
        assert_eq!(parsed.primary_target, "user@example.com");
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_quote_styles() {
        for query in [
            r#"ip:"8.8.8.8""#,
            "ip:'8.8.8.8'",
            "ip:8.8.8.8",
            "ip: 8.8.8.8",
        ] {
            let parsed = parse(query);
            assert_eq!(parsed.primary_target, "8.8.8.8", "query: {query}");
            assert!(parsed.is_valid(), "query: {query}");
        }
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!(
            parse(r#"mail:"a@b.com""#).resolved_type,
            Some(TargetType::Email)
        );
        assert_eq!(parse("tel:+14155551234").resolved_type, Some(TargetType::Phone));
        assert_eq!(parse("handle:someuser").resolved_type, Some(TargetType::Username));
        assert_eq!(
            parse("mac:AA:BB:CC:DD:EE:FF").resolved_type,
            Some(TargetType::Wifi)
        );
    }

    #[test]
    fn test_unknown_field_collected() {
        // A leading unknown field must not demote the query to simple
        let parsed = parse(r#"frobnicate:"x" email:"a@b.com""#);
        assert_eq!(parsed.kind, QueryKind::Structured);
        assert!(!parsed.is_valid());
        assert_eq!(parsed.errors, vec!["Unknown field: frobnicate"]);
        // The recognized field still resolves
        assert_eq!(parsed.resolved_type, Some(TargetType::Email));
        assert_eq!(parsed.primary_target, "a@b.com");
    }

    #[test]
    fn test_invalid_value_collected_without_abort() {
        let parsed = parse(r#"email:"not-an-email" ip:"8.8.8.8""#);
        assert!(!parsed.is_valid());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].contains("Invalid format for email"));
        // Both fields were still captured
        assert_eq!(parsed.fields.len(), 2);
    }

    #[test]
    fn test_type_priority_email_beats_name() {
        let parsed = parse(r#"name:"John Doe" email:"john@example.com""#);
        assert_eq!(parsed.resolved_type, Some(TargetType::Email));
        assert_eq!(parsed.primary_target, "john@example.com");
    }

    #[test]
    fn test_type_priority_ip_beats_domain() {
        let parsed = parse(r#"domain:"example.com" ip:"1.1.1.1""#);
        assert_eq!(parsed.resolved_type, Some(TargetType::Ip));
        assert_eq!(parsed.primary_target, "1.1.1.1");
    }

    #[test]
    fn test_duplicate_field_last_wins() {
        let parsed = parse(r#"email:"first@a.com" email:"second@b.com""#);
        assert_eq!(parsed.fields.len(), 1);
        assert_eq!(parsed.primary_target, "second@b.com");
    }

    #[test]
    fn test_bssid_is_not_structured() {
        // Colons in a MAC must not be treated as field separators
        let parsed = parse("AA:BB:CC:DD:EE:FF");
        assert_eq!(parsed.kind, QueryKind::Simple);
        assert_eq!(parsed.resolved_type, Some(TargetType::Wifi));

        let parsed = parse("aa-bb-cc-dd-ee-ff");
        assert_eq!(parsed.kind, QueryKind::Simple);

        let parsed = parse("AA:BB:CC:DD:EE:FF|CoffeeShop");
        assert_eq!(parsed.kind, QueryKind::Simple);
        assert_eq!(parsed.resolved_type, Some(TargetType::Wifi));
    }

    #[test]
    fn test_unknown_leading_field_name_falls_back_to_simple() {
        // "https" is not a recognized field, so the colon doesn't make
        // this structured; classification then fails and reports
        let parsed = parse("https://example.com/page");
        assert_eq!(parsed.kind, QueryKind::Simple);
    }

    #[test]
    fn test_wifi_components_structured() {
        let parser = QueryParser::new();
        let parsed = parser.parse(r#"bssid:"aa-bb-cc-dd-ee-ff" ssid:"HomeNet""#);
        let (bssid, ssid) = parser.wifi_components(&parsed);
        assert_eq!(bssid.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(ssid.as_deref(), Some("HomeNet"));
    }

    #[test]
    fn test_wifi_components_simple_composite() {
        let parser = QueryParser::new();
        let parsed = parser.parse("aa:bb:cc:dd:ee:ff|CoffeeShop");
        let (bssid, ssid) = parser.wifi_components(&parsed);
        assert_eq!(bssid.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(ssid.as_deref(), Some("CoffeeShop"));
    }

    #[test]
    fn test_wifi_components_non_wifi_query() {
        let parser = QueryParser::new();
        let parsed = parser.parse("user@example.com");
        assert_eq!(parser.wifi_components(&parsed), (None, None));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(parse("user@example.com").to_string(), "EMAIL: user@example.com");
        assert_eq!(
            parse(r#"ip:"8.8.8.8""#).to_string(),
            "ip:\"8.8.8.8\" (IP)"
        );
        assert_eq!(parse("??").to_string(), "unresolved: ??");
    }

    #[test]
    fn test_fields_preserve_order() {
        let parsed = parse(r#"name:"John" email:"j@x.com" domain:"x.com""#);
        let keys: Vec<&str> = parsed.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "email", "domain"]);
    }
}
