//! Gravatar profile lookup.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use spyglass_core::{Finding, TargetType, NONE_FOUND};
use spyglass_plugin::http::send_with_retry;
use spyglass_plugin::{
    LookupModule, ModuleContext, ModuleDescriptor, ModuleError, ModuleResult,
};

const BASE_URL: &str = "https://en.gravatar.com";

/// Email profile lookup via Gravatar.
///
/// No key needed. Gravatar profiles are addressed by a hash of the
/// lowercased email; a 404 means no public profile exists.
pub struct GravatarModule {
    descriptor: ModuleDescriptor,
}

impl GravatarModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("gravatar", "Gravatar", "identity")
                .with_description("Email profile lookup via Gravatar")
                .with_free_types([TargetType::Email])
                .with_rate_limit(60)
                .with_timeout_secs(15),
        }
    }

    /// SHA-256 hex digest of the normalized (trimmed, lowercased) email.
    #[must_use]
    pub fn email_hash(email: &str) -> String {
        let normalized = email.trim().to_lowercase();
        hex::encode(Sha256::digest(normalized.as_bytes()))
    }

    fn parse_profile(data: &serde_json::Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "gravatar";

        let Some(entry) = data.get("entry").and_then(|e| e.get(0)) else {
            return findings;
        };

        let field = |key: &str| entry.get(key).and_then(|v| v.as_str()).unwrap_or("");

        let display_name = field("displayName");
        if !display_name.is_empty() {
            findings.push(Finding::new("Gravatar Name", display_name, source));
        }

        let preferred_username = field("preferredUsername");
        if !preferred_username.is_empty() && preferred_username != display_name {
            findings.push(Finding::new("Username", preferred_username, source));
        }

        let about = field("aboutMe");
        if !about.is_empty() {
            let truncated = if about.chars().count() > 100 {
                let head: String = about.chars().take(100).collect();
                format!("{head}...")
            } else {
                about.to_string()
            };
            findings.push(Finding::new("About", truncated, source));
        }

        let location = field("currentLocation");
        if !location.is_empty() {
            findings.push(Finding::new("Location", location, source));
        }

        let profile_url = field("profileUrl");
        if !profile_url.is_empty() {
            findings.push(Finding::new("Profile URL", profile_url, source));
        }

        let thumbnail_url = field("thumbnailUrl");
        if !thumbnail_url.is_empty() {
            findings.push(Finding::new("Avatar URL", thumbnail_url, source));
        }

        findings
    }
}

impl Default for GravatarModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for GravatarModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let url = format!("{BASE_URL}/{}.json", Self::email_hash(target));

        let response = send_with_retry(ctx.http.get(&url)).await?;

        match response.status().as_u16() {
            200 => {
                let data: serde_json::Value = response.json().await?;
                let mut findings = Self::parse_profile(&data);
                if findings.is_empty() {
                    findings.push(Finding::new("Gravatar Profile", NONE_FOUND, "gravatar"));
                }
                Ok(findings)
            }
            404 => Ok(vec![Finding::new(
                "Gravatar Profile",
                NONE_FOUND,
                "gravatar",
            )]),
            status => Err(ModuleError::UnexpectedStatus {
                status,
                service: "gravatar".to_string(),
            }),
        }
    }
}
