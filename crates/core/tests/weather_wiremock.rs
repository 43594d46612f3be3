//! Weather client tests against a mock Open-Meteo server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use where2go_common::config::WeatherConfig;
use where2go_core::{OpenMeteoClient, WeatherClient, WeatherError, WeatherService, parse_timezone};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()
}

/// Hourly payload for one day with the evening hours listed out of order.
fn sample_hourly_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 44.7,
        "longitude": 10.63,
        "timezone": "Europe/Rome",
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C"
        },
        "hourly": {
            "time": [
                "2025-06-06T12:00",
                "2025-06-06T23:00",
                "2025-06-06T21:00",
                "2025-06-06T22:00"
            ],
            "temperature_2m": [28.4, 19.6, 22.1, 20.9],
            "weather_code": [1, 3, 0, 2],
            "relative_humidity_2m": [40, 71, 58, 64],
            "wind_speed_10m": [8.26, 4.04, 6.16, 5.0],
            "apparent_temperature": [29.0, 19.0, 22.0, 20.5]
        }
    })
}

fn test_config(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn create_test_client(server: &MockServer) -> OpenMeteoClient {
    OpenMeteoClient::new(&test_config(server)).expect("Failed to create client")
}

#[tokio::test]
async fn test_forecast_success_builds_sorted_evening() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_hourly_response()))
        .mount(&server)
        .await;

    let service = WeatherService::with_client(
        Arc::new(create_test_client(&server)),
        parse_timezone("Europe/Rome").unwrap(),
        "Reggio Emilia".to_string(),
    );

    // Wednesday morning: the Friday of the same week is requested
    let now = NaiveDate::from_ymd_opt(2025, 6, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let report = service.friday_forecast_at(now).await.unwrap();

    assert_eq!(report.date, friday());
    assert_eq!(report.city, "Reggio Emilia");
    assert_eq!(report.min_temp, Some(20));
    assert_eq!(report.max_temp, Some(28));

    let hours: Vec<&str> = report.forecasts.iter().map(|f| f.hour.as_str()).collect();
    assert_eq!(hours, vec!["21:00", "22:00", "23:00"]);

    let nine = &report.forecasts[0];
    assert_eq!(nine.datetime, "2025-06-06T21:00");
    assert_eq!(nine.description, "Cielo sereno");
    assert_eq!(nine.icon, "01n");
    assert_eq!(nine.temperature, 22);
    assert_eq!(nine.humidity, 58);
    assert!((nine.wind_speed - 6.2).abs() < f64::EPSILON);

    assert_eq!(report.forecasts[2].description, "Nuvoloso");
}

#[tokio::test]
async fn test_forecast_sends_location_and_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "44.6983"))
        .and(query_param("longitude", "10.6312"))
        .and(query_param("start_date", "2025-06-06"))
        .and(query_param("end_date", "2025-06-06"))
        .and(query_param("timezone", "Europe/Rome"))
        .and(query_param(
            "hourly",
            "temperature_2m,weather_code,relative_humidity_2m,wind_speed_10m,apparent_temperature",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_hourly_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let series = client.hourly_forecast(friday()).await.unwrap();

    assert_eq!(series.time.len(), 4);
}

#[tokio::test]
async fn test_forecast_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Status(500)));
    assert_eq!(err.to_string(), "API Error: 500");
}

#[tokio::test]
async fn test_forecast_non_ok_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert_eq!(err.to_string(), "API Error: 204");
}

#[tokio::test]
async fn test_forecast_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
    assert!(err.to_string().starts_with("Data parsing error:"));
}

#[tokio::test]
async fn test_forecast_missing_hourly_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 44.7
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_forecast_unreachable_server() {
    // Port 1 is reserved and never listening, so the connect is refused.
    let config = WeatherConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 5,
        ..Default::default()
    };

    let client = OpenMeteoClient::new(&config).unwrap();
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
    assert!(err.to_string().starts_with("Network error:"));
}

#[tokio::test]
async fn test_forecast_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_hourly_response())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = WeatherConfig {
        timeout_secs: 1,
        ..test_config(&server)
    };
    let client = OpenMeteoClient::new(&config).unwrap();
    let err = client.hourly_forecast(friday()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
}
