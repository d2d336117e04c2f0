//! WiGLE WiFi network lookups.

use async_trait::async_trait;
use spyglass_core::{classify, Finding, TargetType, NONE_FOUND};
use spyglass_plugin::http::send_with_retry;
use spyglass_plugin::{
    CredentialRequirement, LookupModule, ModuleContext, ModuleDescriptor, ModuleError,
    ModuleResult,
};

const BASE_URL: &str = "https://api.wigle.net/api/v2";

/// WiFi network lookups against the WiGLE.net community database.
///
/// Requires an API name/token pair (HTTP basic auth). A BSSID target
/// queries the network-detail endpoint; a bare SSID falls back to search.
pub struct WigleModule {
    descriptor: ModuleDescriptor,
}

impl WigleModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("wigle", "WiGLE", "wifi_intelligence")
                .with_description("Lookup WiFi networks via the WiGLE.net database")
                .with_key_gated_types([TargetType::Wifi])
                .with_credential(CredentialRequirement::required(
                    "wigle_name",
                    "WiGLE API Name",
                    "https://wigle.net/account",
                ))
                .with_credential(CredentialRequirement::required(
                    "wigle_token",
                    "WiGLE API Token",
                    "https://wigle.net/account",
                ))
                .with_rate_limit(10)
                .with_timeout_secs(30),
        }
    }

    /// WiGLE's netid parameter wants the BSSID without separators.
    fn netid(bssid: &str) -> String {
        bssid.replace(':', "")
    }

    fn parse_network_detail(data: &serde_json::Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "wigle";

        let Some(results) = data.get("results").and_then(|r| r.as_array()) else {
            return findings;
        };

        for network in results.iter().take(3) {
            let field = |key: &str| network.get(key).and_then(|v| v.as_str()).unwrap_or("");

            let ssid = field("ssid");
            if !ssid.is_empty() {
                findings.push(Finding::new("Network Name", ssid, source));
            }

            let lat = network.get("trilat").and_then(serde_json::Value::as_f64);
            let lon = network.get("trilong").and_then(serde_json::Value::as_f64);
            if let (Some(lat), Some(lon)) = (lat, lon) {
                findings.push(Finding::new("Location", format!("{lat}, {lon}"), source));
                findings.push(Finding::new(
                    "Google Maps",
                    format!("https://www.google.com/maps?q={lat},{lon}"),
                    source,
                ));
            }

            let encryption = field("encryption");
            if !encryption.is_empty() {
                findings.push(Finding::new("Encryption", encryption, source));
            }

            let last_seen = field("lastupdt");
            if !last_seen.is_empty() {
                findings.push(Finding::new("Last Seen", last_seen, source));
            }

            let country = field("country");
            if !country.is_empty() {
                findings.push(Finding::new("Country", country, source));
            }
        }

        findings
    }

    fn parse_search_results(data: &serde_json::Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "wigle";

        let Some(results) = data.get("results").and_then(|r| r.as_array()) else {
            return findings;
        };

        if results.is_empty() {
            return findings;
        }

        let total = data
            .get("totalResults")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(results.len() as u64);

        findings.push(Finding::new(
            "Networks Found",
            format!("{total} network(s) matching SSID"),
            source,
        ));

        for network in results.iter().take(5) {
            let netid = network.get("netid").and_then(|v| v.as_str()).unwrap_or("?");
            let lat = network.get("trilat").and_then(serde_json::Value::as_f64);
            let lon = network.get("trilong").and_then(serde_json::Value::as_f64);

            let value = match (lat, lon) {
                (Some(lat), Some(lon)) => format!("{netid} at {lat}, {lon}"),
                _ => netid.to_string(),
            };
            findings.push(Finding::new("Match", value, source));
        }

        findings
    }
}

impl Default for WigleModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for WigleModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let api_name = ctx
            .credential("wigle_name")
            .ok_or_else(|| ModuleError::MissingCredential {
                key_name: "wigle_name".to_string(),
            })?;
        let api_token = ctx
            .credential("wigle_token")
            .ok_or_else(|| ModuleError::MissingCredential {
                key_name: "wigle_token".to_string(),
            })?;

        let (bssid, ssid) = classify::split_wifi_target(target);

        let request = if let Some(bssid) = &bssid {
            let mut req = ctx
                .http
                .get(format!("{BASE_URL}/network/detail"))
                .query(&[("netid", Self::netid(bssid))]);
            if let Some(ssid) = &ssid {
                req = req.query(&[("ssid", ssid)]);
            }
            req
        } else if let Some(ssid) = &ssid {
            ctx.http
                .get(format!("{BASE_URL}/network/search"))
                .query(&[("ssid", ssid)])
        } else {
            return Err(ModuleError::InvalidResponse(
                "target has neither a BSSID nor an SSID".to_string(),
            ));
        };

        let response = send_with_retry(
            request
                .basic_auth(&api_name, Some(&api_token))
                .header("Accept", "application/json"),
        )
        .await?;

        match response.status().as_u16() {
            200 => {
                let data: serde_json::Value = response.json().await?;

                if !data
                    .get("success")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false)
                {
                    let message = data
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or("unknown error");
                    return Err(ModuleError::InvalidResponse(format!(
                        "WiGLE refused the query: {message}"
                    )));
                }

                let mut findings = if bssid.is_some() {
                    Self::parse_network_detail(&data)
                } else {
                    Self::parse_search_results(&data)
                };

                if findings.is_empty() {
                    findings.push(Finding::new("WiFi Network", NONE_FOUND, "wigle"));
                }
                Ok(findings)
            }
            404 => Ok(vec![Finding::new("WiFi Network", NONE_FOUND, "wigle")]),
            status => Err(ModuleError::UnexpectedStatus {
                status,
                service: "wigle".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_requires_both_keys() {
        let module = WigleModule::new();
        let descriptor = module.descriptor();
        assert!(descriptor.validate().is_ok());
        assert!(descriptor.is_key_gated_for(TargetType::Wifi));
        assert_eq!(descriptor.required_keys(), vec!["wigle_name", "wigle_token"]);
    }

    #[test]
    fn test_netid_strips_separators() {
        assert_eq!(WigleModule::netid("AA:BB:CC:DD:EE:FF"), "AABBCCDDEEFF");
    }

    #[test]
    fn test_parse_network_detail() {
        let data = serde_json::json!({
            "success": true,
            "results": [{
                "ssid": "CoffeeShop",
                "trilat": 51.5074,
                "trilong": -0.1278,
                "encryption": "wpa2",
                "lastupdt": "2025-11-02",
                "country": "GB"
            }]
        });

        let findings = WigleModule::parse_network_detail(&data);
        let labels: Vec<&str> = findings.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Network Name", "Location", "Google Maps", "Encryption", "Last Seen", "Country"]
        );
    }

    #[test]
    fn test_parse_search_results_caps_matches() {
        let results: Vec<serde_json::Value> = (0..8)
            .map(|i| serde_json::json!({ "netid": format!("AABBCCDDEE0{i}") }))
            .collect();
        let data = serde_json::json!({ "success": true, "totalResults": 8, "results": results });

        let findings = WigleModule::parse_search_results(&data);
        // One summary plus five matches
        assert_eq!(findings.len(), 6);
        assert!(findings[0].value.starts_with("8 network(s)"));
    }
}
