//! Username presence probes across common platforms.

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use spyglass_core::{Finding, RiskTier, TargetType, NONE_FOUND};
use spyglass_plugin::{LookupModule, ModuleContext, ModuleDescriptor, ModuleResult};
use tracing::debug;

/// Platforms probed by profile-URL status. A 200 means the handle exists.
const PLATFORMS: [(&str, &str); 12] = [
    ("GitHub", "https://github.com/{}"),
    ("Reddit", "https://reddit.com/user/{}"),
    ("Twitter/X", "https://twitter.com/{}"),
    ("Instagram", "https://instagram.com/{}"),
    ("TikTok", "https://tiktok.com/@{}"),
    ("YouTube", "https://youtube.com/@{}"),
    ("Twitch", "https://twitch.tv/{}"),
    ("Steam", "https://steamcommunity.com/id/{}"),
    ("Medium", "https://medium.com/@{}"),
    ("GitLab", "https://gitlab.com/{}"),
    ("Keybase", "https://keybase.io/{}"),
    ("Mastodon", "https://mastodon.social/@{}"),
];

/// Concurrent username presence checks across social platforms.
///
/// Free, no credentials. Individual platform failures are dropped rather
/// than failing the whole probe.
pub struct PlatformsModule {
    descriptor: ModuleDescriptor,
}

impl PlatformsModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("platforms", "Platform Check", "username_enumeration")
                .with_description("Check username presence across social platforms")
                .with_free_types([TargetType::Username])
                .with_rate_limit(30)
                .with_timeout_secs(30),
        }
    }
}

impl Default for PlatformsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for PlatformsModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let username = target.trim().trim_start_matches('@');
        let source = "platforms";

        let mut checks = FuturesUnordered::new();
        for (platform, template) in PLATFORMS {
            let url = template.replace("{}", username);
            let client = ctx.http.clone();
            checks.push(async move {
                match client.get(&url).send().await {
                    Ok(response) => (platform, url, response.status().is_success()),
                    Err(e) => {
                        debug!(platform, error = %e, "platform probe failed");
                        (platform, url, false)
                    }
                }
            });
        }

        let mut found: Vec<(&str, String)> = Vec::new();
        while let Some((platform, url, exists)) = checks.next().await {
            if exists {
                found.push((platform, url));
            }
        }
        found.sort_unstable_by_key(|(platform, _)| *platform);

        if found.is_empty() {
            return Ok(vec![Finding::new("Profiles Found", NONE_FOUND, source)]);
        }

        let names: Vec<&str> = found.iter().map(|(p, _)| *p).collect();
        let mut findings = vec![Finding::new(
            "Profiles Found",
            format!("{} platform(s): {}", found.len(), names.join(", ")),
            source,
        )
        .with_risk(if found.len() > 5 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        })];

        for (platform, url) in found {
            findings.push(Finding::new(format!("Found: {platform}"), url, source));
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_is_free_for_username() {
        let module = PlatformsModule::new();
        assert!(module.descriptor().validate().is_ok());
        assert!(module.descriptor().supports(TargetType::Username));
        assert!(module.descriptor().required_keys().is_empty());
    }

    #[test]
    fn test_platform_templates_have_placeholder() {
        for (platform, template) in PLATFORMS {
            assert!(template.contains("{}"), "{platform} template missing placeholder");
        }
    }
}
