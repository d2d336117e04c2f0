//! IPinfo geolocation and network intelligence.

use async_trait::async_trait;
use spyglass_core::{Finding, RiskTier, TargetType, NONE_FOUND};
use spyglass_plugin::http::fetch_json;
use spyglass_plugin::{
    CredentialRequirement, LookupModule, ModuleContext, ModuleDescriptor, ModuleResult,
};

const BASE_URL: &str = "https://ipinfo.io";

/// IP geolocation lookup via ipinfo.io.
///
/// Works without a key; an optional token raises rate limits and unlocks
/// the privacy (VPN/proxy/Tor) fields.
pub struct IpinfoModule {
    descriptor: ModuleDescriptor,
}

impl IpinfoModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("ipinfo", "IPinfo", "ip_intelligence")
                .with_description("IP geolocation and network intelligence")
                .with_free_types([TargetType::Ip])
                .with_credential(CredentialRequirement::optional(
                    "ipinfo",
                    "IPinfo API Key",
                    "https://ipinfo.io/signup",
                ))
                .with_rate_limit(1000)
                .with_timeout_secs(30),
        }
    }

    fn parse_response(data: &serde_json::Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "ipinfo";

        let field = |key: &str| data.get(key).and_then(|v| v.as_str()).unwrap_or("");

        let location_parts: Vec<&str> = [field("city"), field("region"), field("country")]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if !location_parts.is_empty() {
            findings.push(Finding::new("Location", location_parts.join(", "), source));
        }

        let org = field("org");
        if !org.is_empty() {
            let (asn, org_name) = split_org(org);
            findings.push(Finding::new("Organization", org_name, source));
            if let Some(asn) = asn {
                findings.push(Finding::new("ASN", asn, source));
            }
        }

        let hostname = field("hostname");
        if !hostname.is_empty() {
            findings.push(Finding::new("Hostname", hostname, source));
        }

        let loc = field("loc");
        if !loc.is_empty() {
            findings.push(Finding::new("Coordinates", loc, source));
            findings.push(Finding::new(
                "Google Maps",
                format!("https://www.google.com/maps?q={loc}"),
                source,
            ));
        }

        let timezone = field("timezone");
        if !timezone.is_empty() {
            findings.push(Finding::new("Timezone", timezone, source));
        }

        let postal = field("postal");
        if !postal.is_empty() {
            findings.push(Finding::new("Postal Code", postal, source));
        }

        if let Some(privacy) = data.get("privacy") {
            let flag = |key: &str| privacy.get(key).and_then(|v| v.as_bool()).unwrap_or(false);

            if flag("vpn") {
                findings.push(
                    Finding::new(
                        "VPN Detected",
                        "This IP is associated with a VPN service",
                        source,
                    )
                    .with_risk(RiskTier::Medium),
                );
            }
            if flag("proxy") {
                findings.push(
                    Finding::new(
                        "Proxy Detected",
                        "This IP is associated with a proxy service",
                        source,
                    )
                    .with_risk(RiskTier::Medium),
                );
            }
            if flag("tor") {
                findings.push(
                    Finding::new("Tor Exit Node", "This IP is a Tor exit node", source)
                        .with_risk(RiskTier::High),
                );
            }
            if flag("relay") {
                findings.push(Finding::new(
                    "Relay Service",
                    "This IP is part of a relay service (e.g. iCloud Private Relay)",
                    source,
                ));
            }
            if flag("hosting") {
                findings.push(Finding::new(
                    "Hosting Provider",
                    "This IP belongs to a hosting/cloud provider",
                    source,
                ));
            }
        }

        if findings.is_empty() {
            findings.push(Finding::new("IP Lookup", NONE_FOUND, source));
        }

        findings
    }
}

impl Default for IpinfoModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for IpinfoModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let url = format!("{BASE_URL}/{target}/json");
        let mut request = ctx.http.get(&url);

        if let Some(token) = ctx.credential("ipinfo") {
            request = request.bearer_auth(token);
        }

        let data = fetch_json(request, "ipinfo").await?;
        Ok(Self::parse_response(&data))
    }
}

/// Split ipinfo's `org` field (`"AS12345 Company Name"`) into ASN and name.
fn split_org(org: &str) -> (Option<&str>, &str) {
    if org.starts_with("AS") {
        if let Some((asn, name)) = org.split_once(' ') {
            return (Some(asn), name);
        }
    }
    (None, org)
}
