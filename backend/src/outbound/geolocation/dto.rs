//! Wire types for the IP-geolocation provider.

use serde::Deserialize;

/// Response payload of the provider's JSON endpoint.
///
/// `status` is `"success"` or `"fail"`; on failure `message` carries the
/// reason and the remaining fields are absent.
#[derive(Debug, Clone, Deserialize)]
pub struct IpLookupDto {
    /// Lookup outcome label.
    pub status: String,
    /// Failure reason, present when `status` is `"fail"`.
    #[serde(default)]
    pub message: Option<String>,
    /// City or locality name.
    #[serde(default)]
    pub city: Option<String>,
    /// Region or state name.
    #[serde(default, rename = "regionName")]
    pub region_name: Option<String>,
    /// Approximate latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Approximate longitude.
    #[serde(default)]
    pub lon: Option<f64>,
}

impl IpLookupDto {
    /// Whether the provider placed the address.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn success_payload_decodes() {
        let dto: IpLookupDto = serde_json::from_str(
            r#"{
                "status": "success",
                "city": "Gandhinagar",
                "regionName": "Gujarat",
                "lat": 23.2156,
                "lon": 72.6369
            }"#,
        )
        .expect("payload decodes");
        assert!(dto.is_success());
        assert_eq!(dto.city.as_deref(), Some("Gandhinagar"));
        assert_eq!(dto.region_name.as_deref(), Some("Gujarat"));
    }

    #[rstest]
    fn failure_payload_decodes_without_fields() {
        let dto: IpLookupDto = serde_json::from_str(
            r#"{"status": "fail", "message": "private range"}"#,
        )
        .expect("payload decodes");
        assert!(!dto.is_success());
        assert!(dto.lat.is_none());
    }
}
