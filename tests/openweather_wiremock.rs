//! HTTP adapter tests against wiremock servers

use weatherdash::config::{GeocodingConfig, WeatherConfig};
use weatherdash::{
    Coordinates, GeocoderChain, OpenWeatherClient, ReverseGeocoder, WeatherCondition,
    WeatherDashError, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": {
            "temp": 14.2, "feels_like": 13.6, "temp_min": 12.9, "temp_max": 15.0,
            "pressure": 1008, "humidity": 82
        },
        "visibility": 9000,
        "wind": { "speed": 6.2, "deg": 230, "gust": 11.3 },
        "rain": { "1h": 0.8 },
        "clouds": { "all": 75 },
        "dt": 1_714_557_600,
        "sys": { "country": "FR", "sunrise": 1_714_536_000, "sunset": 1_714_589_000 },
        "timezone": 7200,
        "id": 2_988_507,
        "name": "Paris",
        "cod": 200
    })
}

fn forecast_body(count: usize) -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "dt": 1_714_557_600 + 10_800 * i as i64,
                "main": {
                    "temp": 15.0, "feels_like": 14.0, "temp_min": 13.0, "temp_max": 16.0,
                    "pressure": 1010, "humidity": 70
                },
                "weather": [{ "main": "Clouds", "description": "broken clouds" }],
                "clouds": { "all": 64 },
                "wind": { "speed": 4.0, "deg": 200 },
                "visibility": 10000,
                "pop": 0.2
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "cnt": count,
        "list": list,
        "city": { "name": "Paris", "country": "FR", "timezone": 7200 }
    })
}

fn weather_config(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        timeout_seconds: 5,
        max_retries: 0,
        ..Default::default()
    }
}

#[allow(clippy::expect_used)]
fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(&weather_config(server)).expect("Failed to create client")
}

// ============================================================================
// Weather client
// ============================================================================

#[tokio::test]
async fn test_current_by_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let current = client(&server).current_by_city("Paris").await.unwrap();

    assert_eq!(current.location.display_name(), "Paris, FR");
    assert_eq!(current.sample.condition, WeatherCondition::Rain);
    assert_eq!(current.sample.humidity, 82);
    assert_eq!(current.sample.rain.one_hour, Some(0.8));
    assert_eq!(current.sample.visibility, 9000.0);
    assert_eq!(current.utc_offset.local_minus_utc(), 7200);
}

#[tokio::test]
async fn test_city_name_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).current_by_city("São Paulo").await.is_ok());
}

#[tokio::test]
async fn test_forecast_is_truncated_to_requested_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .mount(&server)
        .await;

    let series = client(&server).forecast_by_city("Paris", 2).await.unwrap();

    assert_eq!(series.samples.len(), 16);
    assert!(
        series
            .samples
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    );
    assert_eq!(series.samples[0].precipitation_probability, Some(0.2));
}

#[tokio::test]
async fn test_by_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(8)))
        .mount(&server)
        .await;

    let client = client(&server);
    let coordinates = Coordinates::new(48.85, 2.35).unwrap();
    let current = client.current_by_coordinates(coordinates).await.unwrap();
    let series = client.forecast_by_coordinates(coordinates, 5).await.unwrap();

    assert_eq!(current.location.name, "Paris");
    assert_eq!(series.samples.len(), 8);
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).current_by_city("Atlantis").await.unwrap_err();
    assert!(matches!(err, WeatherDashError::Api { .. }));
    assert_eq!(err.user_message(), "city not found");
}

#[tokio::test]
async fn test_error_without_message_uses_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client(&server).forecast_by_city("Paris", 5).await.unwrap_err();
    assert_eq!(err.user_message(), "API request failed");
}

#[tokio::test]
async fn test_invalid_payload_is_rejected() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body["main"]["humidity"] = serde_json::json!(150);
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client(&server).current_by_city("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherDashError::Validation { .. }));
}

#[tokio::test]
async fn test_missing_condition_is_rejected() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body["weather"] = serde_json::json!([]);
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client(&server).current_by_city("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherDashError::Validation { .. }));
}

#[tokio::test]
async fn test_unreachable_host_does_not_leak_api_key() {
    let config = WeatherConfig {
        api_key: Some("SECRET-KEY-123".to_string()),
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: 5,
        max_retries: 0,
        ..Default::default()
    };
    let client = OpenWeatherClient::new(&config).unwrap();

    let err = client.current_by_city("Paris").await.unwrap_err();

    assert!(err.user_message().starts_with("Network error"));
    assert!(!err.user_message().contains("SECRET-KEY-123"));
    assert!(!err.to_string().contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_undecodable_body_does_not_leak_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).current_by_city("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherDashError::Validation { .. }));
    assert!(!err.user_message().contains("test-key"));
}

// ============================================================================
// Reverse geocoding chain
// ============================================================================

fn geocoder(nominatim: &MockServer, fallback: &MockServer) -> GeocoderChain {
    let geocoding = GeocodingConfig {
        nominatim_url: nominatim.uri(),
        fallback_url: fallback.uri(),
    };
    GeocoderChain::new(&geocoding, &weather_config(fallback)).unwrap()
}

fn zermatt() -> Coordinates {
    Coordinates::new(46.020_71, 7.749_12).unwrap()
}

#[tokio::test]
async fn test_nominatim_name() {
    let nominatim = MockServer::start().await;
    let fallback = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("zoom", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Zermatt, Visp, Valais, Switzerland",
            "address": {
                "village": "Zermatt",
                "county": "Visp",
                "state": "Valais",
                "country": "Switzerland"
            }
        })))
        .mount(&nominatim)
        .await;

    let name = geocoder(&nominatim, &fallback)
        .place_name(zermatt())
        .await
        .unwrap();
    assert_eq!(name, "Zermatt, Valais, Switzerland");
}

#[tokio::test]
async fn test_fallback_geocoder_after_nominatim_failure() {
    let nominatim = MockServer::start().await;
    let fallback = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&nominatim)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Zermatt", "state": "Valais", "country": "CH" }
        ])))
        .expect(1)
        .mount(&fallback)
        .await;

    let name = geocoder(&nominatim, &fallback)
        .place_name(zermatt())
        .await
        .unwrap();
    assert_eq!(name, "Zermatt, Valais, CH");
}

#[tokio::test]
async fn test_coordinates_when_every_geocoder_fails() {
    let nominatim = MockServer::start().await;
    let fallback = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&nominatim)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&fallback)
        .await;

    let name = geocoder(&nominatim, &fallback)
        .place_name(zermatt())
        .await
        .unwrap();
    assert_eq!(name, "46.0207, 7.7491");
}
