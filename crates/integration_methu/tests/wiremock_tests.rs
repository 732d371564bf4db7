//! Integration tests for the met.hu client using wiremock
//!
//! These tests verify settlement resolution and the forecast form
//! submission against a mock HTTP server.

use chrono::TimeZone;
use domain::LocationRef;
use integration_methu::{ForecastSource, MetHuClient, MetHuConfig, MetHuError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const TWO_DAYS: &str = include_str!("fixtures/two_days.html");

/// Create a test client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer) -> MetHuClient {
    let config = MetHuConfig {
        autocomplete_url: format!("{}/jquery/search.php", mock_server.uri()),
        forecast_url: format!("{}/main.php", mock_server.uri()),
        timeout_secs: 5,
        lookup_timeout_secs: 5,
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    MetHuClient::new(config).expect("Failed to create client")
}

fn budapest() -> LocationRef {
    #[allow(clippy::expect_used)]
    LocationRef::new("Budapest", "13578", 47.4925, 19.0514).expect("valid location")
}

async fn setup_autocomplete_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/jquery/search.php"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/main.php"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Settlement resolution
// ============================================================================

#[tokio::test]
async fn test_resolve_prefers_exact_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jquery/search.php"))
        .and(query_param("term", "Gyula"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"label": "Gyulaháza", "kod": "11001", "lt": "48.13", "n": "22.12"},
            {"label": "Gyula", "kod": "10958", "lt": "46.65", "n": "21.28"},
            {"label": "gyula", "kod": "99999", "lt": "46.00", "n": "21.00"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let location = client.resolve("Gyula").await.unwrap();

    assert_eq!(location.name(), "Gyula");
    assert_eq!(location.code(), "10958");
    assert!((location.latitude() - 46.65).abs() < 1e-9);
}

#[tokio::test]
async fn test_resolve_falls_back_to_first_candidate() {
    let mock_server = MockServer::start().await;

    setup_autocomplete_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"value": "Budapest I. kerület", "id": 13579, "lat": 47.49, "lon": 19.03},
            {"value": "Budapest II. kerület", "id": 13580, "lat": 47.53, "lon": 18.98}
        ])),
    )
    .await;

    let client = create_test_client(&mock_server);
    let location = client.resolve("budapest").await.unwrap();

    assert_eq!(location.name(), "Budapest I. kerület");
    assert_eq!(location.code(), "13579");
}

#[tokio::test]
async fn test_resolve_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jquery/search.php"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Accept-Language", "hu-HU,hu;q=0.9,en;q=0.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"label": "Pécs", "kod": "17404", "lt": "46.07", "n": "18.23"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.resolve("Pécs").await.is_ok());
}

#[tokio::test]
async fn test_resolve_no_candidates() {
    let mock_server = MockServer::start().await;

    setup_autocomplete_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!([])),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.resolve("Nincsilyen").await;

    assert!(
        matches!(result, Err(MetHuError::Resolution(_))),
        "Expected Resolution, got: {result:?}"
    );
}

#[tokio::test]
async fn test_resolve_unparseable_body() {
    let mock_server = MockServer::start().await;

    setup_autocomplete_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<html>Hiba</html>"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.resolve("Szeged").await;

    assert!(matches!(result, Err(MetHuError::Resolution(_))));
}

#[tokio::test]
async fn test_resolve_candidate_without_coordinates() {
    let mock_server = MockServer::start().await;

    setup_autocomplete_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"label": "Szeged", "kod": "20000"}
        ])),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.resolve("Szeged").await;

    assert!(matches!(result, Err(MetHuError::Resolution(_))));
}

#[tokio::test]
async fn test_resolve_server_error() {
    let mock_server = MockServer::start().await;

    setup_autocomplete_mock(&mock_server, ResponseTemplate::new(503)).await;

    let client = create_test_client(&mock_server);
    let result = client.resolve("Debrecen").await;

    assert!(matches!(result, Err(MetHuError::Resolution(_))));
}

// ============================================================================
// Forecast fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_posts_location_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/main.php"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("kod=13578"))
        .and(body_string_contains("lt=47.4925"))
        .and(body_string_contains("n=19.0514"))
        .and(body_string_contains("tel=Budapest"))
        .and(body_string_contains("valtozatlan=true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_DAYS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let body = client.fetch(&budapest()).await.unwrap();

    assert!(body.contains("Hőmérséklet"));
}

#[tokio::test]
async fn test_fetch_uses_configured_client_identifier() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/main.php"))
        .and(body_string_contains("tel=otthon"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_DAYS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = MetHuConfig {
        forecast_url: format!("{}/main.php", mock_server.uri()),
        client_identifier: Some("otthon".to_string()),
        ..Default::default()
    };
    let client = MetHuClient::new(config).unwrap();

    assert!(client.fetch(&budapest()).await.is_ok());
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch(&budapest()).await;

    assert!(
        matches!(result, Err(MetHuError::HttpStatus(500))),
        "Expected HttpStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("  \n "),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch(&budapest()).await;

    assert!(matches!(result, Err(MetHuError::Fetch(_))));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_string(TWO_DAYS)
            .set_delay(std::time::Duration::from_secs(3)),
    )
    .await;

    let config = MetHuConfig {
        forecast_url: format!("{}/main.php", mock_server.uri()),
        timeout_secs: 1,
        ..Default::default()
    };
    let client = MetHuClient::new(config).unwrap();
    let result = client.fetch(&budapest()).await;

    assert!(matches!(result, Err(MetHuError::Fetch(_))));
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test]
async fn test_get_forecast_builds_snapshot() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string(TWO_DAYS),
    )
    .await;

    let client = create_test_client(&mock_server);
    let fetched_at = chrono_tz::Europe::Budapest
        .with_ymd_and_hms(2026, 2, 25, 13, 0, 0)
        .single()
        .unwrap();
    let snapshot = client.get_forecast_at(&budapest(), fetched_at).await.unwrap();

    assert_eq!(snapshot.location().code(), "13578");
    assert_eq!(snapshot.hourly().len(), 8);
    assert_eq!(snapshot.daily().len(), 2);
    assert_eq!(snapshot.current().map(|r| r.temperature), Some(Some(9.0)));
}

#[tokio::test]
async fn test_get_forecast_without_table_is_parse_failure() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<p>Nincs adat</p>"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.get_forecast(&budapest()).await;

    assert!(matches!(result, Err(MetHuError::ParseStructure(_))));
}

#[tokio::test]
async fn test_get_forecast_without_periods_is_empty_forecast() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string(
            "<table><tr><td></td><td>06</td><td>12</td></tr>\
             <tr><td>Hőmérséklet</td><td>-</td><td>-</td></tr></table>",
        ),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.get_forecast(&budapest()).await;

    assert!(matches!(result, Err(MetHuError::EmptyForecast)));
}
