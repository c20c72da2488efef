use crate::helpers::{spawn_app, MockWeatherAccess};
use api::Error;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response, StatusCode},
};
use hyper::{header, Method};
use mockall::predicate::eq;
use serde_json::from_slice;
use std::sync::Arc;
use time::macros::datetime;
use tower::ServiceExt;
use weather_logger_core::{CompassPoint, StoreError, WeatherRecord};

fn gdynia(id: i64, time: &str) -> WeatherRecord {
    WeatherRecord {
        id: Some(id),
        city: String::from("Gdynia"),
        formatted_time: time.to_string(),
        weather_code: 1,
        description: Some(String::from("mostly clear")),
        temperature: String::from("18.2"),
        wind_speed: String::from("4.5"),
        direction: CompassPoint::SW,
    }
}

fn corrupt_store() -> Error {
    Error::Store(StoreError::Integrity(String::from("corrupt")))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap()
}

async fn call(weather_data: MockWeatherAccess, request: Request<Body>) -> Response<Body> {
    let test_app = spawn_app(Arc::new(weather_data)).await;
    test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.")
}

async fn body_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    from_slice(&body).unwrap()
}

#[tokio::test]
async fn latest_returns_most_recent_record() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data
        .expect_latest()
        .times(1)
        .returning(|| Ok(Some(gdynia(7, "2023-09-04 21:00"))));

    let response = call(weather_data, get("/weather/latest")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let record: WeatherRecord = body_json(response).await;
    assert_eq!(record, gdynia(7, "2023-09-04 21:00"));
}

#[tokio::test]
async fn root_serves_latest_record() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data
        .expect_latest()
        .times(1)
        .returning(|| Ok(Some(gdynia(1, "2023-09-04 21:00"))));

    let response = call(weather_data, get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(response).await;
    assert_eq!(body["city"], "Gdynia");
    assert_eq!(body["direction"], "SW");
    assert_eq!(body["temperature"], "18.2");
}

#[tokio::test]
async fn latest_on_empty_store_is_not_found() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data.expect_latest().times(1).returning(|| Ok(None));

    let response = call(weather_data, get("/weather/latest")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_store_failure_is_internal_error() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data
        .expect_latest()
        .times(1)
        .returning(|| Err(corrupt_store()));

    let response = call(weather_data, get("/weather/latest")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn range_query_passes_parsed_bounds() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data
        .expect_between()
        .with(
            eq(datetime!(2023-09-04 19:00 UTC)),
            eq(datetime!(2023-09-04 20:00 UTC)),
        )
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                gdynia(1, "2023-09-04 21:00"),
                gdynia(2, "2023-09-04 22:00"),
            ])
        });
    weather_data.expect_all().never();

    let response = call(
        weather_data,
        get("/weather?startTime=2023-09-04T19:00:00Z&endTime=2023-09-04T22:00:00%2B02:00"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<WeatherRecord> = body_json(response).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(1));
}

#[tokio::test]
async fn missing_bound_returns_every_record() {
    for uri in [
        "/weather",
        "/weather?startTime=2023-09-04T19:00:00Z",
        "/weather?endTime=2023-09-04T19:00:00Z",
    ] {
        let mut weather_data = MockWeatherAccess::new();
        weather_data
            .expect_all()
            .times(1)
            .returning(|| Ok(vec![gdynia(1, "2023-09-04 21:00")]));
        weather_data.expect_between().never();

        let response = call(weather_data, get(uri)).await;

        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let records: Vec<WeatherRecord> = body_json(response).await;
        assert_eq!(records.len(), 1, "{}", uri);
    }
}

#[tokio::test]
async fn malformed_bound_is_bad_request() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data.expect_all().never();
    weather_data.expect_between().never();

    let response = call(
        weather_data,
        get("/weather?startTime=yesterday&endTime=2023-09-04T19:00:00Z"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_store_state() {
    let mut healthy = MockWeatherAccess::new();
    healthy.expect_health_check().times(1).returning(|| Ok(()));
    let response = call(healthy, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut broken = MockWeatherAccess::new();
    broken
        .expect_health_check()
        .times(1)
        .returning(|| Err(corrupt_store()));
    let response = call(broken, get("/health")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let mut weather_data = MockWeatherAccess::new();
    weather_data.expect_latest().returning(|| Ok(None));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/weather/latest")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = call(weather_data, request).await;

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn serves_api_docs() {
    let response = call(MockWeatherAccess::new(), get("/docs")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
