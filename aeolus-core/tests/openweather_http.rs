//! OpenWeather client against a mock HTTP server.

use aeolus_core::{Config, OpenWeatherClient, WeatherError, WeatherService};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn london_geocode() -> serde_json::Value {
    serde_json::json!([{
        "name": "London",
        "local_names": { "en": "London" },
        "lat": 51.51,
        "lon": -0.13,
        "country": "GB",
        "state": "England"
    }])
}

fn london_weather() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.13, "lat": 51.51 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "04d" }],
        "base": "stations",
        "main": {
            "temp": 15.4,
            "feels_like": 14.9,
            "temp_min": 14.0,
            "temp_max": 17.0,
            "pressure": 1012,
            "humidity": 70
        },
        "visibility": 10000,
        "wind": { "speed": 3.2, "deg": 240 },
        "dt": 1_760_443_200,
        "sys": { "country": "GB", "sunrise": 1_760_423_000, "sunset": 1_760_461_000 },
        "timezone": 3600,
        "name": "City of Westminster",
        "cod": 200
    })
}

fn london_forecast() -> serde_json::Value {
    let entry = |txt: &str, temp: f64, icon: &str, desc: &str| {
        serde_json::json!({
            "dt_txt": txt,
            "main": { "temp": temp, "temp_min": temp - 1.0, "temp_max": temp + 1.0, "humidity": 80 },
            "weather": [{ "icon": icon, "description": desc }]
        })
    };

    serde_json::json!({
        "cod": "200",
        "cnt": 4,
        "list": [
            entry("2026-10-14 12:00:00", 15.2, "04d", "broken clouds"),
            entry("2026-10-14 15:00:00", 16.1, "10d", "light rain"),
            entry("2026-10-14 18:00:00", 13.7, "10n", "light rain"),
            entry("2026-10-14 21:00:00", 11.4, "01n", "clear sky"),
        ]
    })
}

/// Client pointed at the mock server for both the API and icon hosts.
fn create_test_client(mock_server: &MockServer) -> OpenWeatherClient {
    let config = Config {
        api_key: Some("TEST_KEY".into()),
        api_base_url: mock_server.uri(),
        icon_base_url: format!("{}/img/wn", mock_server.uri()),
        request_timeout_secs: 5,
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    OpenWeatherClient::from_config(&config).expect("Failed to create client")
}

async fn mount_geocode(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

// ============================================================================
// Current weather
// ============================================================================

#[tokio::test]
async fn fetch_weather_normalizes_london_payload() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, london_geocode()).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.51"))
        .and(query_param("lon", "-0.13"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let record = client.fetch_weather("London").await.expect("weather");

    assert_eq!(record.city, "London");
    assert_eq!(record.country, "GB");
    assert_eq!(record.temperature, 15);
    assert_eq!(record.temperature_min, 14);
    assert_eq!(record.temperature_max, 17);
    assert_eq!(record.real_feel, 15);
    assert_eq!(record.humidity, 70);
    assert!((record.wind_speed - 3.2).abs() < f64::EPSILON);
    assert_eq!(record.description, "Light Rain");
    assert_eq!(record.weather_icon, "04d");
    assert!((record.latitude - 51.51).abs() < f64::EPSILON);
    assert!((record.longitude + 0.13).abs() < f64::EPSILON);
}

#[tokio::test]
async fn city_with_country_code_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "London,GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_geocode()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let location = client.resolve_coordinates("London,GB").await.expect("match");

    assert_eq!(location.name, "London");
    assert_eq!(location.country.as_deref(), Some("GB"));
}

#[tokio::test]
async fn zero_matches_skip_the_weather_call() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, serde_json::json!([])).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let resolved = client.resolve_coordinates("Qwxzzy").await;
    assert_eq!(resolved, Err(WeatherError::NotFound("Qwxzzy".into())));

    let result = client.fetch_weather("Qwxzzy").await;
    assert!(
        matches!(result, Err(WeatherError::NotFound(_))),
        "Expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn blank_city_never_reaches_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(matches!(
        client.resolve_coordinates("").await,
        Err(WeatherError::NotFound(_))
    ));
    assert!(matches!(
        client.fetch_weather("   ").await,
        Err(WeatherError::NotFound(_))
    ));
}

#[tokio::test]
async fn geocode_server_error_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"cod":401}"#))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_weather("London").await;

    assert!(
        matches!(result, Err(WeatherError::NotFound(_))),
        "Expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn weather_server_error_is_network_failure() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, london_geocode()).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_weather("London").await;

    match result {
        Err(WeatherError::NetworkFailure(detail)) => assert!(detail.contains("500")),
        other => panic!("Expected NetworkFailure, got: {other:?}"),
    }
}

#[tokio::test]
async fn payload_without_main_temp_is_malformed() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, london_geocode()).await;

    let mut payload = london_weather();
    if let Some(main) = payload["main"].as_object_mut() {
        main.remove("temp");
    }

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_weather("London").await;

    assert!(
        matches!(result, Err(WeatherError::MalformedResponse(_))),
        "Expected MalformedResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, london_geocode()).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_weather("London").await;

    assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn fetch_forecast_requests_configured_count() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, london_geocode()).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("cnt", "4"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let entries = client.fetch_forecast("London").await.expect("forecast");

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].temperature, 15);
    assert_eq!(entries[1].description, "Light Rain");
    assert_eq!(entries[3].weather_icon, "01n");
}

#[tokio::test]
async fn weather_then_forecast_geocodes_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_geocode()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.51"))
        .and(query_param("lon", "-0.13"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let record = client.fetch_weather("London").await.expect("weather");
    let entries = client.fetch_forecast_at(&record.location()).await.expect("forecast");

    assert_eq!(entries.len(), 4);
}

// ============================================================================
// Icons
// ============================================================================

#[tokio::test]
async fn fetch_icon_returns_bytes_on_200() {
    let mock_server = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    Mock::given(method("GET"))
        .and(path("/img/wn/04d@4x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert_eq!(client.fetch_icon("04d").await, Some(png));
}

#[tokio::test]
async fn fetch_icon_404_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/img/wn/99x@4x.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert_eq!(client.fetch_icon("99x").await, None);
}

#[tokio::test]
async fn fetch_icon_swallows_network_errors() {
    let config = Config {
        api_key: Some("TEST_KEY".into()),
        icon_base_url: "http://127.0.0.1:1/img/wn".into(),
        request_timeout_secs: 2,
        ..Default::default()
    };
    let client = OpenWeatherClient::from_config(&config).expect("client");

    assert_eq!(client.fetch_icon("04d").await, None);
}
