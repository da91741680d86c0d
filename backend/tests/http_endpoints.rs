//! End-to-end tests for the REST surface against the in-memory sample
//! store: no database and no network, matching the server's self-contained
//! fallback mode.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::Value;

use darpan_backend::inbound::http::health::HealthState;
use darpan_backend::server::{BackendComponents, ServerConfig, build_app, build_components};

fn sample_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".parse().expect("valid socket address"),
        database_url: None,
        home_state: "Gujarat".to_owned(),
        trend_window_months: 12,
        geolocation_endpoint: "http://ip-api.invalid/".parse().expect("valid url"),
        geolocation_timeout: Duration::from_secs(10),
    }
}

async fn sample_app()
-> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let BackendComponents { http_state, .. } = build_components(&sample_config())
        .await
        .expect("components build without a database");
    let health_state = HealthState::new();
    health_state.mark_ready();
    test::init_service(build_app(
        web::Data::new(http_state),
        web::Data::new(health_state),
    ))
    .await
}

#[rstest]
#[actix_web::test]
async fn districts_listing_is_ordered_by_name() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/districts").to_request(),
    )
    .await;

    let names: Vec<&str> = body
        .as_array()
        .expect("array response")
        .iter()
        .filter_map(|d| d.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, ["Gandhinagar", "Porbandar", "Surat"]);
}

#[rstest]
#[actix_web::test]
async fn nearest_district_resolves_a_probe_point() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nearest-district?lat=23.21&lon=72.64")
            .to_request(),
    )
    .await;

    assert_eq!(body.get("id").and_then(Value::as_i64), Some(1));
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Gandhinagar"));
}

#[rstest]
#[actix_web::test]
async fn geolocation_matches_a_centroid_exactly() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/geolocation?lat=23.2156&lon=72.6369")
            .to_request(),
    )
    .await;

    assert_eq!(body.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        body.get("district_code").and_then(Value::as_str),
        Some("GD-GNR")
    );
    assert_eq!(
        body.get("district_name_hindi").and_then(Value::as_str),
        Some("गांधीनगर")
    );
}

#[rstest]
#[actix_web::test]
async fn last_selection_remembers_a_resolved_district() {
    let app = sample_app().await;

    let before: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/last-selection").to_request(),
    )
    .await;
    assert_eq!(before.get("success").and_then(Value::as_bool), Some(false));

    let _resolved: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/geolocation?lat=23.2156&lon=72.6369")
            .to_request(),
    )
    .await;

    let after: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/last-selection").to_request(),
    )
    .await;
    assert_eq!(after.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        after.get("district_code").and_then(Value::as_str),
        Some("GD-GNR")
    );
}

#[rstest]
#[actix_web::test]
async fn geolocation_rejects_malformed_coordinates() {
    let app = sample_app().await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/geolocation?lat=95.0&lon=72.0")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn detect_location_degrades_to_manual_selection() {
    let app = sample_app().await;

    // The fixture geolocation source cannot place any address, so the
    // endpoint must answer success=false rather than an error.
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/detect-location")
            .peer_addr("203.0.113.7:40000".parse().expect("valid socket"))
            .to_request(),
    )
    .await;

    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert!(body.get("district_code").is_none());
}

#[rstest]
#[actix_web::test]
async fn latest_snapshot_is_the_most_recent_month() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/district/1/latest")
            .to_request(),
    )
    .await;

    assert_eq!(body.get("year").and_then(Value::as_i64), Some(2025));
    assert_eq!(body.get("month").and_then(Value::as_i64), Some(9));
    assert_eq!(
        body.get("person_days").and_then(Value::as_i64),
        Some(2_510_000)
    );
}

#[rstest]
#[actix_web::test]
async fn trend_returns_recorded_months_in_order() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/district/1/trend")
            .to_request(),
    )
    .await;

    let months: Vec<i64> = body
        .as_array()
        .expect("array response")
        .iter()
        .filter_map(|p| p.get("month").and_then(Value::as_i64))
        .collect();
    assert_eq!(months, [6, 7, 8, 9]);
}

#[rstest]
#[actix_web::test]
async fn comparison_carries_state_average_and_rank() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/district/2/compare")
            .to_request(),
    )
    .await;

    assert_eq!(
        body.get("state_avg_person_days").and_then(Value::as_i64),
        Some(1_970_000)
    );
    assert_eq!(body.get("district_rank").and_then(Value::as_i64), Some(2));
    assert_eq!(body.get("total_districts").and_then(Value::as_i64), Some(3));
    assert_eq!(
        body.pointer("/district/person_days").and_then(Value::as_i64),
        Some(2_480_000)
    );
}

#[rstest]
#[actix_web::test]
async fn dashboard_joins_all_views_and_echoes_generation() {
    let app = sample_app().await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/district/1/dashboard?generation=7")
            .to_request(),
    )
    .await;

    assert_eq!(body.get("generation").and_then(Value::as_u64), Some(7));
    assert!(body.get("latest").is_some());
    assert_eq!(
        body.get("trend").and_then(Value::as_array).map(Vec::len),
        Some(4)
    );
    assert!(body.get("comparison").is_some());
}

#[rstest]
#[actix_web::test]
async fn unknown_districts_yield_not_found() {
    let app = sample_app().await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/district/99/latest")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
}

#[rstest]
#[actix_web::test]
async fn health_probes_answer() {
    let app = sample_app().await;

    let live = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(ready.status(), StatusCode::OK);
}
