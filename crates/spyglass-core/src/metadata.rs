//! Per-type metadata extraction.
//!
//! After classification, lookup modules often need structured facts about
//! the target (email domain, BSSID vendor prefix, domain TLD, ...). This
//! module derives those facts locally, without any network I/O.

use crate::classify::{normalize_bssid, split_wifi_target};
use crate::types::TargetType;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

const COMMON_EMAIL_PROVIDERS: [&str; 4] =
    ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// Calling-code prefixes for country-code guessing, longest-prefix-first.
///
/// Covers the common 1-3 digit prefixes; numbers outside this table get
/// no country code rather than a wrong one.
const CALLING_CODES: [(&str, &str); 16] = [
    ("353", "IE"),
    ("358", "FI"),
    ("420", "CZ"),
    ("972", "IL"),
    ("31", "NL"),
    ("33", "FR"),
    ("34", "ES"),
    ("39", "IT"),
    ("44", "GB"),
    ("46", "SE"),
    ("49", "DE"),
    ("61", "AU"),
    ("81", "JP"),
    ("86", "CN"),
    ("91", "IN"),
    ("1", "US/CA"),
];

/// Structured facts derived from a classified target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetMetadata {
    /// IP address facts from the parsed form.
    Ip {
        /// "IPv4" or "IPv6"
        version: &'static str,
        /// RFC 1918 / ULA range
        is_private: bool,
        /// Loopback range
        is_loopback: bool,
        /// Multicast range
        is_multicast: bool,
    },
    /// Email address split into parts.
    Email {
        /// Mailbox domain, lowercased
        domain: String,
        /// Part before the `@`
        local_part: String,
        /// Whether the domain is a major consumer provider
        is_common_provider: bool,
    },
    /// Phone number normalized and prefix-matched.
    Phone {
        /// Digits only, leading `+` dropped
        digits: String,
        /// E.164 form when the input carried a `+` prefix
        e164: Option<String>,
        /// Country guess from the calling-code prefix table
        country: Option<&'static str>,
    },
    /// WiFi network components.
    Wifi {
        /// Normalized BSSID (uppercase, colon-separated), if present
        bssid: Option<String>,
        /// Network name, if present
        ssid: Option<String>,
        /// First three octets of the BSSID, for vendor lookup
        oui: Option<String>,
    },
    /// Domain name split into levels.
    Domain {
        /// Top-level domain
        tld: String,
        /// Second-level domain
        sld: String,
        /// Everything left of the SLD, if any
        subdomain: Option<String>,
        /// Number of dot-separated labels
        level: usize,
    },
    /// Types with no local structure to extract.
    Plain,
}

/// Extract structured metadata for a classified target.
///
/// Target types without local structure (username, address, hash, name)
/// return [`TargetMetadata::Plain`].
#[must_use]
pub fn extract_metadata(input: &str, target_type: TargetType) -> TargetMetadata {
    let input = input.trim();

    match target_type {
        TargetType::Ip => ip_metadata(input),
        TargetType::Email => email_metadata(input),
        TargetType::Phone => phone_metadata(input),
        TargetType::Wifi => wifi_metadata(input),
        TargetType::Domain => domain_metadata(input),
        _ => TargetMetadata::Plain,
    }
}

fn ip_metadata(input: &str) -> TargetMetadata {
    let Ok(addr) = input.parse::<IpAddr>() else {
        return TargetMetadata::Plain;
    };

    let is_private = match addr {
        IpAddr::V4(v4) => v4.is_private(),
        // No stable is_unique_local yet; fc00::/7 check by leading byte
        IpAddr::V6(v6) => (v6.octets()[0] & 0xfe) == 0xfc,
    };

    TargetMetadata::Ip {
        version: if addr.is_ipv4() { "IPv4" } else { "IPv6" },
        is_private,
        is_loopback: addr.is_loopback(),
        is_multicast: addr.is_multicast(),
    }
}

fn email_metadata(input: &str) -> TargetMetadata {
    let (local_part, domain) = input.rsplit_once('@').unwrap_or((input, ""));
    let domain = domain.to_lowercase();

    TargetMetadata::Email {
        is_common_provider: COMMON_EMAIL_PROVIDERS.contains(&domain.as_str()),
        local_part: local_part.to_string(),
        domain,
    }
}

fn phone_metadata(input: &str) -> TargetMetadata {
    let has_plus = input.trim_start().starts_with('+');
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let country = if has_plus {
        CALLING_CODES
            .iter()
            .find(|(prefix, _)| digits.starts_with(prefix))
            .map(|(_, country)| *country)
    } else {
        None
    };

    let e164 = has_plus.then(|| format!("+{digits}"));

    TargetMetadata::Phone {
        digits,
        e164,
        country,
    }
}

fn wifi_metadata(input: &str) -> TargetMetadata {
    let (bssid, ssid) = split_wifi_target(input);

    let oui = bssid.as_deref().map(|b| {
        let normalized = normalize_bssid(b);
        normalized
            .split(':')
            .take(3)
            .collect::<Vec<_>>()
            .join(":")
    });

    TargetMetadata::Wifi { bssid, ssid, oui }
}

fn domain_metadata(input: &str) -> TargetMetadata {
    let lowered = input.to_lowercase();
    let parts: Vec<&str> = lowered.split('.').collect();

    let tld = parts.last().copied().unwrap_or("").to_string();
    let sld = if parts.len() > 1 {
        parts[parts.len() - 2].to_string()
    } else {
        String::new()
    };
    let subdomain = if parts.len() > 2 {
        Some(parts[..parts.len() - 2].join("."))
    } else {
        None
    };

    TargetMetadata::Domain {
        tld,
        sld,
        subdomain,
        level: parts.len(),
    }
}
