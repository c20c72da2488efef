use crate::helpers::{gdynia, place_service, respond, weather_service, FORECAST_BODY, GEOCODE_BODY};
use daemon::{FetchError, PlaceName, PlaceSource, RawWeatherObservation, WeatherSource};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn fetches_current_weather_for_coordinate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "54.52"))
        .and(query_param("longitude", "18.53"))
        .and(query_param("current_weather", "true"))
        .and(header("user-agent", "weather-logger-tests"))
        .respond_with(respond(200, FORECAST_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let service = weather_service(&server);
    let observation = service.fetch_weather(&gdynia()).await.unwrap();

    assert_eq!(
        observation,
        RawWeatherObservation {
            temperature: 18.2,
            wind_speed: 4.5,
            wind_direction: 210.0,
            weather_code: 1,
            time: String::from("2023-09-04T21:00"),
            is_day: true,
        }
    );
}

#[tokio::test]
async fn weather_server_error_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(respond(503, "try later"))
        .mount(&server)
        .await;

    let service = weather_service(&server);
    let err = service.fetch_weather(&gdynia()).await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }), "{:?}", err);
}

#[tokio::test]
async fn malformed_weather_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(respond(200, r#"{"current_weather": {}}"#))
        .mount(&server)
        .await;

    let service = weather_service(&server);
    let err = service.fetch_weather(&gdynia()).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }), "{:?}", err);
}

#[tokio::test]
async fn unreachable_weather_endpoint_is_a_network_failure() {
    let server = MockServer::start().await;
    let service = weather_service(&server);
    drop(server);

    let err = service.fetch_weather(&gdynia()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }), "{:?}", err);
}

#[tokio::test]
async fn resolves_city_from_reverse_geocode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "54.52"))
        .and(query_param("lon", "18.53"))
        .respond_with(respond(200, GEOCODE_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let service = place_service(&server, None);
    let place = service.resolve_place(&gdynia()).await.unwrap();

    assert_eq!(place, PlaceName::new("Gdynia"));
}

#[tokio::test]
async fn sends_api_key_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("api_key", "secret"))
        .respond_with(respond(200, r#"{"address": {"city": "Gdynia"}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let service = place_service(&server, Some("secret"));
    let place = service.resolve_place(&gdynia()).await.unwrap();

    assert_eq!(place.as_str(), "Gdynia");
}

#[tokio::test]
async fn malformed_geocode_body_resolves_to_empty_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(respond(200, "<html>not json</html>"))
        .mount(&server)
        .await;

    let service = place_service(&server, None);
    let place = service.resolve_place(&gdynia()).await.unwrap();

    assert!(place.is_empty());
}

#[tokio::test]
async fn geocode_server_error_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(respond(401, "missing api key"))
        .mount(&server)
        .await;

    let service = place_service(&server, None);
    let err = service.resolve_place(&gdynia()).await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
}
