//! Target classification.
//!
//! Resolves a raw user-supplied string to a [`TargetType`] using a fixed
//! precedence order. Classification is a pure function: no I/O, no state.
//!
//! Precedence (earlier wins on ambiguity): IP, WiFi BSSID, hash, email,
//! phone, domain, username, address. A string matching none of these
//! returns `None` and the caller must ask the user to disambiguate.

use crate::types::TargetType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]{10,}$").expect("valid regex"));

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9](?:\.[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9])*$")
        .expect("valid regex")
});

static BSSID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("valid regex"));

static BARE_HEX12_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{12}$").expect("valid regex"));

static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9]+$").expect("valid regex"));

static BCRYPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$2[aby]?\$").expect("valid regex"));

static MYSQL41_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*[a-fA-F0-9]{40}$").expect("valid regex"));

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

static ADDRESS_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Street number + name
        r"\b\d+\s+[a-z0-9\s]+\b",
        // Street types
        r"\b(st|street|ave|avenue|rd|road|blvd|boulevard|dr|drive|ct|court|ln|lane|way|pl|place)\b",
        // City indicators
        r"\b(city|town|village)\b",
        // City, state zip pattern
        r",\s*[a-z\s]+\d{5}?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Hash algorithm recognized by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// 32 hex chars — MD5 or NTLM (indistinguishable without context)
    Md5,
    /// 40 hex chars
    Sha1,
    /// 56 hex chars
    Sha224,
    /// 64 hex chars
    Sha256,
    /// 96 hex chars
    Sha384,
    /// 128 hex chars
    Sha512,
    /// `*` followed by 40 hex chars
    MySql41,
    /// `$2a$` / `$2b$` / `$2y$` prefix
    Bcrypt,
    /// `$argon2` prefix
    Argon2,
}

impl HashKind {
    /// Human-readable algorithm label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5/NTLM",
            Self::Sha1 => "SHA1",
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::MySql41 => "MySQL 4.1+",
            Self::Bcrypt => "bcrypt",
            Self::Argon2 => "Argon2",
        }
    }
}

/// Classify a raw input string into a target type.
///
/// Returns `None` when nothing matches; the caller must treat that as
/// ambiguous rather than silently defaulting. Whitespace is trimmed before
/// all checks, so padded input classifies identically to its trimmed form.
#[must_use]
pub fn classify(input: &str) -> Option<TargetType> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // IP address (most specific)
    if is_ip_address(input) {
        return Some(TargetType::Ip);
    }

    // BSSID/WiFi (before hash since both are hex)
    if is_bssid(input) {
        return Some(TargetType::Wifi);
    }

    // Hash patterns (kept ahead of email for parity with long-standing
    // behavior; hex-only hashes cannot actually contain '@')
    if hash_kind(input).is_some() {
        return Some(TargetType::Hash);
    }

    if is_email(input) {
        return Some(TargetType::Email);
    }

    if is_phone_number(input) {
        return Some(TargetType::Phone);
    }

    // Domain before username since domains can look like usernames
    if is_domain(input) {
        return Some(TargetType::Domain);
    }

    if is_username(input) {
        return Some(TargetType::Username);
    }

    // Address is the most general heuristic, checked last
    if is_address(input) {
        return Some(TargetType::Address);
    }

    None
}

/// Check whether the string parses as a strict IPv4 or IPv6 address.
///
/// `std::net` parsing rejects out-of-range octets and incomplete quads.
#[must_use]
pub fn is_ip_address(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Check whether the string is a valid email address (RFC-lite).
#[must_use]
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Check whether the string looks like a phone number.
///
/// Requires at least 10 digits after stripping formatting characters.
#[must_use]
pub fn is_phone_number(s: &str) -> bool {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if digits.chars().filter(char::is_ascii_digit).count() < 10 {
        return false;
    }
    PHONE_RE.is_match(s)
}

/// Check whether the string could be a username.
///
/// 3-30 chars of `[A-Za-z0-9_-]`, not all digits. A leading `@` is ignored.
#[must_use]
pub fn is_username(s: &str) -> bool {
    let username = s.trim_start_matches('@');

    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    if !USERNAME_RE.is_match(username) {
        return false;
    }

    // Bare digit runs are never usernames (nor phones under 10 digits)
    !username.chars().all(|c| c.is_ascii_digit())
}

/// Check whether the string looks like a physical address.
///
/// Requires at least two of: street number + name, street-type keyword,
/// city/town keyword, "`, state zip`" pattern.
#[must_use]
pub fn is_address(s: &str) -> bool {
    let lowered = s.to_lowercase();
    let matches = ADDRESS_INDICATORS
        .iter()
        .filter(|re| re.is_match(&lowered))
        .count();
    matches >= 2
}

/// Check whether the string is a valid BSSID (MAC address).
///
/// Accepts colon- or dash-separated octet pairs, the bare 12-hex form,
/// and the `BSSID|SSID` composite (only the BSSID segment is judged).
#[must_use]
pub fn is_bssid(s: &str) -> bool {
    let bssid = match s.split_once('|') {
        Some((head, _)) => head.trim(),
        None => s,
    };

    BSSID_RE.is_match(bssid) || BARE_HEX12_RE.is_match(bssid)
}

/// Check whether the string is a valid domain name.
///
/// Must contain a dot, carry no `@`, not be IP-shaped, and end in an
/// alphabetic TLD of 2-10 characters.
#[must_use]
pub fn is_domain(s: &str) -> bool {
    if !s.contains('.') || s.contains('@') {
        return false;
    }

    // Leading digit-dot-digit is IP-shaped, not a domain
    let mut parts = s.splitn(2, '.');
    if let (Some(first), Some(rest)) = (parts.next(), parts.next()) {
        if first.chars().all(|c| c.is_ascii_digit())
            && rest.chars().next().is_some_and(|c| c.is_ascii_digit())
        {
            return false;
        }
    }

    if !DOMAIN_RE.is_match(s) {
        return false;
    }

    let tld = s.rsplit('.').next().unwrap_or("");
    tld.len() >= 2 && tld.len() <= 10 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Detect the hash algorithm of a string, if it is one.
#[must_use]
pub fn hash_kind(s: &str) -> Option<HashKind> {
    let s = s.trim();

    if BCRYPT_RE.is_match(s) {
        return Some(HashKind::Bcrypt);
    }

    if s.starts_with("$argon2") {
        return Some(HashKind::Argon2);
    }

    if MYSQL41_RE.is_match(s) {
        return Some(HashKind::MySql41);
    }

    if !HEX_RE.is_match(s) {
        return None;
    }

    match s.len() {
        32 => Some(HashKind::Md5),
        40 => Some(HashKind::Sha1),
        56 => Some(HashKind::Sha224),
        64 => Some(HashKind::Sha256),
        96 => Some(HashKind::Sha384),
        128 => Some(HashKind::Sha512),
        _ => None,
    }
}

/// Split a WiFi target into `(bssid, ssid)` components.
///
/// Handles a pure BSSID, the `BSSID|SSID` composite, and a bare SSID.
/// BSSIDs are normalized to uppercase, colon-separated form.
#[must_use]
pub fn split_wifi_target(s: &str) -> (Option<String>, Option<String>) {
    let s = s.trim();

    if let Some((head, tail)) = s.split_once('|') {
        let head = head.trim();
        let tail = tail.trim();
        let ssid = if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        };
        if is_bssid(head) {
            return (Some(normalize_bssid(head)), ssid);
        }
        return (None, ssid);
    }

    if is_bssid(s) {
        (Some(normalize_bssid(s)), None)
    } else if s.is_empty() {
        (None, None)
    } else {
        (None, Some(s.to_string()))
    }
}

/// Normalize a BSSID to uppercase colon-separated octet pairs.
#[must_use]
pub fn normalize_bssid(bssid: &str) -> String {
    let upper = bssid.trim().replace('-', ":").to_uppercase();
    if upper.contains(':') {
        return upper;
    }

    // Bare 12-hex form: insert separators
    upper
        .as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(":")
}
