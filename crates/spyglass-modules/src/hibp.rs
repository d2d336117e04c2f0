//! Have I Been Pwned breach and paste lookups.

use async_trait::async_trait;
use spyglass_core::{Finding, RiskTier, TargetType, NONE_FOUND};
use spyglass_plugin::http::send_with_retry;
use spyglass_plugin::{
    CredentialRequirement, LookupModule, ModuleContext, ModuleDescriptor, ModuleError,
    ModuleResult,
};

const BASE_URL: &str = "https://haveibeenpwned.com/api/v3";

/// Breach and paste lookups via the HIBP API v3.
///
/// Key-gated for both emails and domains. The API answers 404 for a
/// clean account, which maps to the clean sentinel rather than an error.
pub struct HibpModule {
    descriptor: ModuleDescriptor,
}

impl HibpModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("hibp", "Have I Been Pwned", "breach_detection")
                .with_description("Check for data breaches and pastes via the HIBP API")
                .with_key_gated_types([TargetType::Email, TargetType::Domain])
                .with_credential(CredentialRequirement::required(
                    "hibp",
                    "HIBP API Key",
                    "https://haveibeenpwned.com/API/Key",
                ))
                .with_rate_limit(120)
                .with_timeout_secs(30),
        }
    }

    fn summarize_breaches(breaches: &[serde_json::Value]) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "hibp";

        let names: Vec<&str> = breaches
            .iter()
            .take(5)
            .map(|b| b.get("Name").and_then(|n| n.as_str()).unwrap_or("Unknown"))
            .collect();
        let total = breaches.len();

        findings.push(
            Finding::new(
                "Data Breaches",
                format!(
                    "Found in {total} breaches: {}{}",
                    names.join(", "),
                    if total > 5 { "..." } else { "" }
                ),
                source,
            )
            .with_risk(RiskTier::High),
        );

        for breach in breaches.iter().take(3) {
            let name = breach.get("Name").and_then(|n| n.as_str()).unwrap_or("Unknown");
            let date = breach
                .get("BreachDate")
                .and_then(|d| d.as_str())
                .unwrap_or("Unknown");

            let data_classes: Vec<&str> = breach
                .get("DataClasses")
                .and_then(|d| d.as_array())
                .map(|classes| {
                    classes
                        .iter()
                        .filter_map(|c| c.as_str())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let mut exposed = data_classes.iter().take(3).copied().collect::<Vec<_>>().join(", ");
            if data_classes.len() > 3 {
                exposed.push_str(&format!(" (+{} more)", data_classes.len() - 3));
            }

            findings.push(
                Finding::new(
                    format!("Breach: {name}"),
                    format!("Date: {date} | Exposed: {exposed}"),
                    source,
                )
                .with_risk(RiskTier::Medium),
            );
        }

        findings
    }

    async fn check_breaches(
        &self,
        ctx: &ModuleContext,
        target: &str,
        api_key: &str,
    ) -> ModuleResult<Vec<Finding>> {
        let url = format!("{BASE_URL}/breachedaccount/{target}?truncateResponse=false");
        let request = ctx.http.get(&url).header("hibp-api-key", api_key);

        let response = send_with_retry(request).await?;

        match response.status().as_u16() {
            200 => {
                let breaches: Vec<serde_json::Value> = response.json().await?;
                Ok(Self::summarize_breaches(&breaches))
            }
            404 => Ok(vec![Finding::new("Data Breaches", NONE_FOUND, "hibp")]),
            status => Err(ModuleError::UnexpectedStatus {
                status,
                service: "hibp".to_string(),
            }),
        }
    }

    async fn check_pastes(
        &self,
        ctx: &ModuleContext,
        email: &str,
        api_key: &str,
    ) -> ModuleResult<Vec<Finding>> {
        let url = format!("{BASE_URL}/pasteaccount/{email}");
        let request = ctx.http.get(&url).header("hibp-api-key", api_key);

        let response = send_with_retry(request).await?;

        match response.status().as_u16() {
            200 => {
                let pastes: Vec<serde_json::Value> = response.json().await?;
                if pastes.is_empty() {
                    return Ok(vec![Finding::new("Pastes", NONE_FOUND, "hibp")]);
                }

                let mut sources: Vec<&str> = pastes
                    .iter()
                    .map(|p| p.get("Source").and_then(|s| s.as_str()).unwrap_or("Unknown"))
                    .collect();
                sources.sort_unstable();
                sources.dedup();

                Ok(vec![Finding::new(
                    "Pastes",
                    format!("Found in {} paste(s) on: {}", pastes.len(), sources.join(", ")),
                    "hibp",
                )
                .with_risk(RiskTier::Medium)])
            }
            404 => Ok(vec![Finding::new("Pastes", NONE_FOUND, "hibp")]),
            status => Err(ModuleError::UnexpectedStatus {
                status,
                service: "hibp".to_string(),
            }),
        }
    }
}

impl Default for HibpModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for HibpModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let api_key = ctx
            .credential("hibp")
            .ok_or_else(|| ModuleError::MissingCredential {
                key_name: "hibp".to_string(),
            })?;

        let mut findings = self.check_breaches(ctx, target, &api_key).await?;

        // Pastes are indexed by email address only
        if target_type == TargetType::Email {
            findings.extend(self.check_pastes(ctx, target, &api_key).await?);
        }

        Ok(findings)
    }
}
