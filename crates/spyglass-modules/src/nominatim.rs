//! Address geocoding via OpenStreetMap Nominatim.

use async_trait::async_trait;
use spyglass_core::{Finding, TargetType, NONE_FOUND};
use spyglass_plugin::http::fetch_json;
use spyglass_plugin::{LookupModule, ModuleContext, ModuleDescriptor, ModuleResult};

const BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Physical address geocoding against the OSM Nominatim service.
///
/// Free, no key. Nominatim asks for at most one request per second, so
/// the advisory rate limit is set accordingly.
pub struct NominatimModule {
    descriptor: ModuleDescriptor,
}

impl NominatimModule {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new("nominatim", "Nominatim (OSM)", "identity")
                .with_description("Geocode physical addresses via OpenStreetMap")
                .with_free_types([TargetType::Address])
                .with_rate_limit(60)
                .with_timeout_secs(30),
        }
    }

    fn parse_place(place: &serde_json::Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let source = "nominatim";

        let field = |key: &str| place.get(key).and_then(|v| v.as_str()).unwrap_or("");

        let display_name = field("display_name");
        if !display_name.is_empty() {
            findings.push(Finding::new("Formatted Address", display_name, source));
        }

        let lat = field("lat");
        let lon = field("lon");
        if !lat.is_empty() && !lon.is_empty() {
            findings.push(Finding::new("Coordinates", format!("{lat}, {lon}"), source));
            findings.push(Finding::new(
                "Google Maps",
                format!("https://www.google.com/maps?q={lat},{lon}"),
                source,
            ));
        }

        if let Some(addr) = place.get("address") {
            let part = |key: &str| addr.get(key).and_then(|v| v.as_str()).unwrap_or("");

            let country = part("country");
            if !country.is_empty() {
                let code = part("country_code").to_uppercase();
                let value = if code.is_empty() {
                    country.to_string()
                } else {
                    format!("{country} ({code})")
                };
                findings.push(Finding::new("Country", value, source));
            }

            let state = [part("state"), part("province")]
                .into_iter()
                .find(|s| !s.is_empty());
            if let Some(state) = state {
                findings.push(Finding::new("State/Province", state, source));
            }

            let city = [part("city"), part("town"), part("village")]
                .into_iter()
                .find(|s| !s.is_empty());
            if let Some(city) = city {
                findings.push(Finding::new("City", city, source));
            }

            let postcode = part("postcode");
            if !postcode.is_empty() {
                findings.push(Finding::new("Postal Code", postcode, source));
            }
        }

        let place_class = field("class");
        let place_type = field("type");
        if !place_class.is_empty() || !place_type.is_empty() {
            let value = [place_class, place_type]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("/");
            findings.push(Finding::new("Place Type", value, source));
        }

        findings
    }
}

impl Default for NominatimModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupModule for NominatimModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        let request = ctx.http.get(format!("{BASE_URL}/search")).query(&[
            ("q", target),
            ("format", "json"),
            ("limit", "1"),
            ("addressdetails", "1"),
        ]);

        let data = fetch_json(request, "nominatim").await?;

        let findings = data
            .as_array()
            .and_then(|places| places.first())
            .map(Self::parse_place)
            .unwrap_or_default();

        if findings.is_empty() {
            return Ok(vec![Finding::new("Geocoding", NONE_FOUND, "nominatim")]);
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_is_free_for_address() {
        let module = NominatimModule::new();
        assert!(module.descriptor().validate().is_ok());
        assert!(module.descriptor().supports(TargetType::Address));
        assert!(module.descriptor().required_keys().is_empty());
    }

    #[test]
    fn test_parse_place() {
        let place = serde_json::json!({
            "display_name": "221B Baker Street, London, England, United Kingdom",
            "lat": "51.5238",
            "lon": "-0.1586",
            "class": "tourism",
            "type": "museum",
            "address": {
                "city": "London",
                "state": "England",
                "postcode": "NW1 6XE",
                "country": "United Kingdom",
                "country_code": "gb"
            }
        });

        let findings = NominatimModule::parse_place(&place);
        let labels: Vec<&str> = findings.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Formatted Address",
                "Coordinates",
                "Google Maps",
                "Country",
                "State/Province",
                "City",
                "Postal Code",
                "Place Type"
            ]
        );

        let country = findings.iter().find(|f| f.label == "Country").expect("country finding");
        assert_eq!(country.value, "United Kingdom (GB)");
        let place_type = findings.iter().find(|f| f.label == "Place Type").expect("type finding");
        assert_eq!(place_type.value, "tourism/museum");
    }

    #[test]
    fn test_parse_place_town_fallback() {
        let place = serde_json::json!({
            "address": { "town": "Rye" }
        });
        let findings = NominatimModule::parse_place(&place);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].label, "City");
        assert_eq!(findings[0].value, "Rye");
    }
}
