//! District resolution from coordinates or client IP.
//!
//! The coordinate path matches the nearest centroid by great-circle
//! distance. The IP path consults the selection cache, then the external
//! geolocation source, and maps the returned locality by exact district name
//! or nearest centroid. Lookup failures are expected alternate paths: they
//! surface as "select manually" errors, never as internal failures.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::district::{Coordinates, District, DistrictId};
use crate::domain::error::Error;
use crate::domain::geo::nearest_district;
use crate::domain::ports::{
    CachedSelection, DEFAULT_LOCATION_TTL, DistrictRepository, DistrictRepositoryError,
    IpGeolocationSource, IpLocality, LAST_SELECTION_KEY, LAST_SELECTION_TTL, SelectionCache,
    ip_cache_key,
};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDistrict {
    /// Surrogate id of the matched district.
    pub id: DistrictId,
    /// Stable external code of the matched district.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Hindi rendering of the name, when known.
    pub name_hindi: Option<String>,
    /// Distance from the probe point to the centroid, when the coordinate
    /// path produced the match.
    pub distance_km: Option<f64>,
}

impl ResolvedDistrict {
    fn from_district(district: &District, distance_km: Option<f64>) -> Self {
        Self {
            id: district.id,
            code: district.code.clone(),
            name: district.name.clone(),
            name_hindi: district.name_hindi.clone(),
            distance_km,
        }
    }
}

/// Resolves a citizen's district from coordinates or a client IP.
pub struct LocationResolver {
    districts: Arc<dyn DistrictRepository>,
    geolocation: Arc<dyn IpGeolocationSource>,
    cache: Arc<dyn SelectionCache>,
    clock: Arc<dyn Clock>,
    location_ttl: Duration,
}

impl LocationResolver {
    /// Create a resolver with the default location cache window.
    pub fn new(
        districts: Arc<dyn DistrictRepository>,
        geolocation: Arc<dyn IpGeolocationSource>,
        cache: Arc<dyn SelectionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            districts,
            geolocation,
            cache,
            clock,
            location_ttl: DEFAULT_LOCATION_TTL,
        }
    }

    /// Override the freshness window for IP-derived cache entries.
    #[must_use]
    pub fn with_location_ttl(mut self, ttl: Duration) -> Self {
        self.location_ttl = ttl;
        self
    }

    /// Resolve the nearest district to a coordinate pair.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when no district carries centroid data;
    /// [`Error::unavailable`] when the directory cannot be read.
    pub async fn resolve_coordinates(
        &self,
        point: Coordinates,
    ) -> Result<ResolvedDistrict, Error> {
        let resolved = self.nearest_in_directory(point).await?;
        self.remember(LAST_SELECTION_KEY, &resolved, LAST_SELECTION_TTL);
        Ok(resolved)
    }

    /// Resolve the district behind a client IP, consulting the cache first.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the locality cannot be matched to a
    /// district (the caller should prompt for manual selection);
    /// [`Error::unavailable`] when the geolocation service cannot be
    /// reached.
    pub async fn resolve_ip(&self, ip: IpAddr) -> Result<ResolvedDistrict, Error> {
        let key = ip_cache_key(ip);
        if let Some(cached) = self.cache.get(&key) {
            if let Some(district) = self
                .districts
                .find_by_code(&cached.district_code)
                .await
                .map_err(map_district_error)?
            {
                debug!(ip = %ip, code = %district.code, "ip resolution served from cache");
                return Ok(ResolvedDistrict::from_district(&district, None));
            }
        }

        let locality = self
            .geolocation
            .locate(ip)
            .await
            .map_err(|err| {
                warn!(ip = %ip, error = %err, "ip geolocation lookup failed");
                Error::unavailable("location service unavailable; please select a district manually")
            })?
            .ok_or_else(select_manually)?;

        let resolved = self.match_locality(&locality).await?;
        self.remember(&key, &resolved, self.location_ttl);
        self.remember(LAST_SELECTION_KEY, &resolved, LAST_SELECTION_TTL);
        Ok(resolved)
    }

    /// The last successfully resolved district, when still fresh.
    pub async fn last_selection(&self) -> Result<Option<ResolvedDistrict>, Error> {
        let Some(cached) = self.cache.get(LAST_SELECTION_KEY) else {
            return Ok(None);
        };
        Ok(self
            .districts
            .find_by_code(&cached.district_code)
            .await
            .map_err(map_district_error)?
            .map(|district| ResolvedDistrict::from_district(&district, None)))
    }

    async fn match_locality(&self, locality: &IpLocality) -> Result<ResolvedDistrict, Error> {
        if let Some(city) = locality.city.as_deref() {
            if let Some(district) = self
                .districts
                .find_by_name(city)
                .await
                .map_err(map_district_error)?
            {
                return Ok(ResolvedDistrict::from_district(&district, None));
            }
        }
        if let Some(point) = locality.coordinates {
            return self.nearest_in_directory(point).await;
        }
        Err(select_manually())
    }

    async fn nearest_in_directory(
        &self,
        point: Coordinates,
    ) -> Result<ResolvedDistrict, Error> {
        let candidates = self
            .districts
            .all_with_centroids()
            .await
            .map_err(map_district_error)?;
        let (district, distance) =
            nearest_district(point, &candidates).ok_or_else(select_manually)?;
        Ok(ResolvedDistrict::from_district(district, Some(distance)))
    }

    fn remember(&self, key: &str, resolved: &ResolvedDistrict, ttl: Duration) {
        self.cache.put(
            key,
            CachedSelection {
                district_code: resolved.code.clone(),
                resolved_at: self.clock.utc(),
            },
            ttl,
        );
    }
}

fn select_manually() -> Error {
    Error::not_found("no district matched; please select a district manually")
}

fn map_district_error(error: DistrictRepositoryError) -> Error {
    match error {
        DistrictRepositoryError::Connection { message } => {
            Error::unavailable(format!("district directory unavailable: {message}"))
        }
        DistrictRepositoryError::Query { message } => {
            Error::internal(format!("district directory error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::district::NewDistrict;
    use crate::domain::ports::{
        FixtureIpGeolocationSource, IpGeolocationError, InMemoryStore,
    };

    /// Cache double that stores entries without expiring them.
    #[derive(Default)]
    struct RecordingCache {
        entries: Mutex<HashMap<String, CachedSelection>>,
    }

    impl SelectionCache for RecordingCache {
        fn put(&self, key: &str, value: CachedSelection, _ttl: Duration) {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.insert(key.to_owned(), value);
        }

        fn get(&self, key: &str) -> Option<CachedSelection> {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.get(key).cloned()
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0)
                .single()
                .unwrap_or_default()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl IpGeolocationSource for FailingSource {
        async fn locate(
            &self,
            _ip: IpAddr,
        ) -> Result<Option<IpLocality>, IpGeolocationError> {
            Err(IpGeolocationError::timeout("deadline exceeded"))
        }
    }

    fn resolver_with(
        source: Arc<dyn IpGeolocationSource>,
        cache: Arc<RecordingCache>,
    ) -> LocationResolver {
        LocationResolver::new(
            Arc::new(InMemoryStore::with_sample_data()),
            source,
            cache,
            Arc::new(FixedClock),
        )
    }

    fn probe_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))
    }

    #[rstest]
    #[tokio::test]
    async fn coordinates_resolve_and_record_last_selection() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver_with(
            Arc::new(FixtureIpGeolocationSource::unplaced()),
            Arc::clone(&cache),
        );

        let point = Coordinates::try_new(23.21, 72.64).expect("valid point");
        let resolved = resolver
            .resolve_coordinates(point)
            .await
            .expect("resolution succeeds");

        assert_eq!(resolved.name, "Gandhinagar");
        let remembered = cache.get(LAST_SELECTION_KEY).expect("selection recorded");
        assert_eq!(remembered.district_code, resolved.code);
    }

    #[rstest]
    #[tokio::test]
    async fn ip_locality_with_coordinates_maps_to_nearest() {
        let locality = IpLocality {
            city: Some("Unlisted Town".to_owned()),
            region: Some("Gujarat".to_owned()),
            coordinates: Some(Coordinates::try_new(21.18, 72.83).expect("valid point")),
        };
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver_with(
            Arc::new(FixtureIpGeolocationSource::with_locality(locality)),
            Arc::clone(&cache),
        );

        let resolved = resolver.resolve_ip(probe_ip()).await.expect("resolution succeeds");
        assert_eq!(resolved.name, "Surat");
        assert!(cache.get(&ip_cache_key(probe_ip())).is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn ip_locality_city_name_matches_exactly() {
        let locality = IpLocality {
            city: Some("porbandar".to_owned()),
            region: None,
            coordinates: None,
        };
        let resolver = resolver_with(
            Arc::new(FixtureIpGeolocationSource::with_locality(locality)),
            Arc::new(RecordingCache::default()),
        );

        let resolved = resolver.resolve_ip(probe_ip()).await.expect("resolution succeeds");
        assert_eq!(resolved.name, "Porbandar");
    }

    #[rstest]
    #[tokio::test]
    async fn cached_ip_resolution_skips_the_source() {
        let cache = Arc::new(RecordingCache::default());
        cache.put(
            &ip_cache_key(probe_ip()),
            CachedSelection {
                district_code: "GD-SRT".to_owned(),
                resolved_at: FixedClock.utc(),
            },
            Duration::from_secs(60),
        );
        // A failing source proves the cache short-circuits the lookup.
        let resolver = resolver_with(Arc::new(FailingSource), Arc::clone(&cache));

        let resolved = resolver.resolve_ip(probe_ip()).await.expect("cache hit");
        assert_eq!(resolved.name, "Surat");
    }

    #[rstest]
    #[tokio::test]
    async fn unplaced_address_prompts_manual_selection() {
        let resolver = resolver_with(
            Arc::new(FixtureIpGeolocationSource::unplaced()),
            Arc::new(RecordingCache::default()),
        );

        let err = resolver.resolve_ip(probe_ip()).await.expect_err("no match");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn source_failure_reports_unavailable() {
        let resolver = resolver_with(
            Arc::new(FailingSource),
            Arc::new(RecordingCache::default()),
        );

        let err = resolver.resolve_ip(probe_ip()).await.expect_err("lookup fails");
        assert_eq!(err.code(), ErrorCode::Unavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_directory_reports_not_found() {
        let store = InMemoryStore::new();
        store
            .insert(&NewDistrict {
                state: "Gujarat".to_owned(),
                code: "GD-XXX".to_owned(),
                name: "No Centroid".to_owned(),
                name_hindi: None,
                centroid: None,
            })
            .await
            .expect("insert works");
        let resolver = LocationResolver::new(
            Arc::new(store),
            Arc::new(FixtureIpGeolocationSource::unplaced()),
            Arc::new(RecordingCache::default()),
            Arc::new(FixedClock),
        );

        let point = Coordinates::try_new(23.0, 72.0).expect("valid point");
        let err = resolver
            .resolve_coordinates(point)
            .await
            .expect_err("nothing to match");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
