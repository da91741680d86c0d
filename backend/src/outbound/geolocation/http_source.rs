//! Reqwest-backed IP-geolocation source adapter.
//!
//! Owns transport details only: URL construction, timeout and HTTP error
//! mapping, and JSON decoding into the domain locality type.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::Coordinates;
use crate::domain::ports::{IpGeolocationError, IpGeolocationSource, IpLocality};

use super::dto::IpLookupDto;

/// Default lookup deadline. Resolution must fall back to manual selection
/// rather than hang the dashboard.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields requested from the provider; keeps payloads minimal.
const RESPONSE_FIELDS: &str = "status,message,city,regionName,lat,lon";

/// IP-geolocation adapter performing HTTP GET requests against one endpoint.
pub struct GeolocationHttpSource {
    client: Client,
    endpoint: Url,
}

impl GeolocationHttpSource {
    /// Build an adapter with the default lookup timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Build an adapter with an explicit lookup timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    fn lookup_url(&self, ip: IpAddr) -> Result<Url, IpGeolocationError> {
        let mut url = self
            .endpoint
            .join(&format!("json/{ip}"))
            .map_err(|err| IpGeolocationError::transport(err.to_string()))?;
        url.query_pairs_mut().append_pair("fields", RESPONSE_FIELDS);
        Ok(url)
    }
}

#[async_trait]
impl IpGeolocationSource for GeolocationHttpSource {
    async fn locate(&self, ip: IpAddr) -> Result<Option<IpLocality>, IpGeolocationError> {
        let response = self
            .client
            .get(self.lookup_url(ip)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let dto: IpLookupDto = serde_json::from_slice(&body)
            .map_err(|err| IpGeolocationError::decode(err.to_string()))?;
        Ok(dto_to_locality(dto))
    }
}

fn dto_to_locality(dto: IpLookupDto) -> Option<IpLocality> {
    if !dto.is_success() {
        return None;
    }
    let coordinates = match (dto.lat, dto.lon) {
        (Some(lat), Some(lon)) => Coordinates::try_new(lat, lon).ok(),
        _ => None,
    };
    Some(IpLocality {
        city: dto.city,
        region: dto.region_name,
        coordinates,
    })
}

fn map_transport_error(error: reqwest::Error) -> IpGeolocationError {
    if error.is_timeout() {
        IpGeolocationError::timeout(error.to_string())
    } else {
        IpGeolocationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> IpGeolocationError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IpGeolocationError::timeout(format!("status {}", status.as_u16()))
        }
        _ => IpGeolocationError::transport(format!("status {}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn source() -> GeolocationHttpSource {
        let endpoint = Url::parse("http://ip-api.example/").expect("valid endpoint");
        GeolocationHttpSource::new(endpoint).expect("client builds")
    }

    #[rstest]
    fn lookup_url_embeds_address_and_fields() {
        let url = source()
            .lookup_url("203.0.113.7".parse().expect("valid ip"))
            .expect("url builds");
        assert_eq!(url.path(), "/json/203.0.113.7");
        assert!(
            url.query()
                .is_some_and(|q| q.contains("fields=status%2Cmessage"))
        );
    }

    #[rstest]
    fn failed_lookups_become_unplaced() {
        let dto = IpLookupDto {
            status: "fail".to_owned(),
            message: Some("reserved range".to_owned()),
            city: None,
            region_name: None,
            lat: None,
            lon: None,
        };
        assert!(dto_to_locality(dto).is_none());
    }

    #[rstest]
    fn successful_lookups_carry_validated_coordinates() {
        let dto = IpLookupDto {
            status: "success".to_owned(),
            message: None,
            city: Some("Surat".to_owned()),
            region_name: Some("Gujarat".to_owned()),
            lat: Some(21.1702),
            lon: Some(72.8311),
        };
        let locality = dto_to_locality(dto).expect("placed");
        assert!(locality.coordinates.is_some());
        assert_eq!(locality.city.as_deref(), Some("Surat"));
    }

    #[rstest]
    fn out_of_range_coordinates_are_dropped() {
        let dto = IpLookupDto {
            status: "success".to_owned(),
            message: None,
            city: Some("Nowhere".to_owned()),
            region_name: None,
            lat: Some(120.0),
            lon: Some(72.0),
        };
        let locality = dto_to_locality(dto).expect("placed");
        assert!(locality.coordinates.is_none());
    }

    #[rstest]
    #[case(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn statuses_map_to_expected_errors(#[case] status: StatusCode, #[case] timeout: bool) {
        let err = map_status_error(status);
        assert_eq!(matches!(err, IpGeolocationError::Timeout { .. }), timeout);
    }
}
