//! Server construction and wiring.
//!
//! Builds the dependency graph behind [`HttpState`]: database-backed
//! adapters when `DATABASE_URL` is configured, the in-memory sample store
//! otherwise, so the server always starts and integration tests need no
//! database.

mod config;

use std::io;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

pub use config::{ConfigError, ServerConfig};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    DistrictRepository, FixtureIpGeolocationSource, InMemoryStore, IpGeolocationSource,
    MetricsRepository,
};
use crate::domain::{DashboardService, LocationResolver};
use crate::inbound::http::dashboard::{
    district_compare, district_dashboard, district_latest, district_trend,
};
use crate::inbound::http::districts::{list_districts, nearest_district};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::location::{detect_location, geolocation, last_selection};
use crate::inbound::http::state::HttpState;
use crate::middleware::RequestId;
use crate::outbound::cache::InMemorySelectionCache;
use crate::outbound::geolocation::GeolocationHttpSource;
use crate::outbound::persistence::{
    DbPool, DieselDistrictRepository, DieselMetricsRepository, PoolConfig, run_migrations,
};

/// Wired adapter bundle behind the HTTP surface.
pub struct BackendComponents {
    /// Handler dependency bundle.
    pub http_state: HttpState,
    /// Metrics store, exposed separately for seeding and ingestion.
    pub metrics: Arc<dyn MetricsRepository>,
}

/// Build the adapter graph for the given configuration.
///
/// With a `DATABASE_URL`, runs pending migrations and wires the Diesel
/// repositories; without one, falls back to the in-memory sample store and a
/// fixture geolocation source so the server runs self-contained.
///
/// # Errors
///
/// Returns [`io::Error`] when the pool, migrations, or the outbound HTTP
/// client cannot be initialised.
pub async fn build_components(config: &ServerConfig) -> io::Result<BackendComponents> {
    let clock = Arc::new(DefaultClock);
    let cache = Arc::new(InMemorySelectionCache::new(clock.clone()));

    let (districts, metrics, geolocation_source): (
        Arc<dyn DistrictRepository>,
        Arc<dyn MetricsRepository>,
        Arc<dyn IpGeolocationSource>,
    ) = match &config.database_url {
        Some(url) => {
            run_migrations(url)
                .await
                .map_err(|err| io::Error::other(format!("migrations failed: {err}")))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| io::Error::other(format!("pool construction failed: {err}")))?;
            let source = GeolocationHttpSource::with_timeout(
                config.geolocation_endpoint.clone(),
                config.geolocation_timeout,
            )
            .map_err(|err| io::Error::other(format!("http client failed: {err}")))?;
            info!("persistence wired to PostgreSQL");
            (
                Arc::new(DieselDistrictRepository::new(pool.clone())),
                Arc::new(DieselMetricsRepository::new(pool)),
                Arc::new(source),
            )
        }
        None => {
            warn!("DATABASE_URL not set; serving the in-memory sample dataset");
            let store = Arc::new(InMemoryStore::with_sample_data());
            (
                store.clone(),
                store,
                Arc::new(FixtureIpGeolocationSource::unplaced()),
            )
        }
    };

    let resolver = Arc::new(LocationResolver::new(
        districts.clone(),
        geolocation_source,
        cache,
        clock,
    ));
    let dashboard = Arc::new(
        DashboardService::new(districts.clone(), metrics.clone())
            .with_trend_window(config.trend_window_months),
    );

    Ok(BackendComponents {
        http_state: HttpState::new(districts, resolver, dashboard, config.home_state.clone()),
        metrics,
    })
}

/// Assemble the Actix application around the given state.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(list_districts)
        .service(nearest_district)
        .service(geolocation)
        .service(detect_location)
        .service(last_selection)
        .service(district_latest)
        .service(district_trend)
        .service(district_compare)
        .service(district_dashboard);

    let mut app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(RequestId)
        .service(api)
        .service(live)
        .service(ready);

    #[cfg(debug_assertions)]
    {
        app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app
}

/// Build the components and run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns [`io::Error`] on wiring, bind, or serve failures.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let components = build_components(&config).await?;

    #[cfg(feature = "district-data")]
    {
        let settings = crate::seed::SeedSettings::from_env();
        let outcome = crate::seed::seed_on_startup(
            &settings,
            components.http_state.districts.clone(),
            components.metrics.clone(),
            &DefaultClock,
        )
        .await
        .map_err(|err| io::Error::other(format!("seeding failed: {err}")))?;
        info!(?outcome, "startup seeding finished");
    }

    let http_state = web::Data::new(components.http_state);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(http_state.clone(), server_health_state.clone())
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    server.run().await
}
