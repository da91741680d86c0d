//! Port abstraction for the external IP-geolocation service.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::domain::district::Coordinates;

/// Locality information returned by an IP-geolocation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocality {
    /// City or locality name, when the provider reports one.
    pub city: Option<String>,
    /// Region or state name, when the provider reports one.
    pub region: Option<String>,
    /// Approximate coordinates, when the provider reports them.
    pub coordinates: Option<Coordinates>,
}

/// Failures raised by IP-geolocation source adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpGeolocationError {
    /// The lookup did not complete within the configured deadline.
    #[error("ip geolocation lookup timed out: {message}")]
    Timeout {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Transport-level failure reaching the provider.
    #[error("ip geolocation transport failed: {message}")]
    Transport {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The provider answered with an undecodable payload.
    #[error("ip geolocation response undecodable: {message}")]
    Decode {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl IpGeolocationError {
    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Lookup of the locality behind a client IP.
#[async_trait]
pub trait IpGeolocationSource: Send + Sync {
    /// Locate the address. `Ok(None)` means the provider answered but could
    /// not place the address (private ranges, unlisted allocations).
    async fn locate(&self, ip: IpAddr) -> Result<Option<IpLocality>, IpGeolocationError>;
}

/// Deterministic source used by tests and the no-database server mode.
#[derive(Debug, Clone, Default)]
pub struct FixtureIpGeolocationSource {
    locality: Option<IpLocality>,
}

impl FixtureIpGeolocationSource {
    /// A source that places every address at the given locality.
    #[must_use]
    pub const fn with_locality(locality: IpLocality) -> Self {
        Self {
            locality: Some(locality),
        }
    }

    /// A source that cannot place any address.
    #[must_use]
    pub const fn unplaced() -> Self {
        Self { locality: None }
    }
}

#[async_trait]
impl IpGeolocationSource for FixtureIpGeolocationSource {
    async fn locate(&self, _ip: IpAddr) -> Result<Option<IpLocality>, IpGeolocationError> {
        Ok(self.locality.clone())
    }
}
