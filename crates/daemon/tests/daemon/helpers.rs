use daemon::{Coordinate, JsonFetcher, PlaceService, WeatherService};
use slog::{o, Discard, Logger};
use std::sync::Arc;
use wiremock::{MockServer, ResponseTemplate};

pub const FORECAST_BODY: &str = r#"{"current_weather": {"temperature": 18.2,
    "windspeed": 4.5, "winddirection": 210, "weathercode": 1, "is_day": 1,
    "time": "2023-09-04T21:00"}}"#;

pub const GEOCODE_BODY: &str = r#"{"place_id": 1, "address": {"road": "Świętojańska",
    "city": "Gdynia", "state": "pomorskie", "country": "Polska", "country_code": "pl"}}"#;

pub fn logger() -> Logger {
    Logger::root(Discard, o!())
}

pub fn respond(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_string(body)
}

pub fn fetcher() -> Arc<JsonFetcher> {
    Arc::new(JsonFetcher::new(logger(), "weather-logger-tests").unwrap())
}

pub fn gdynia() -> Coordinate {
    Coordinate::new("54.52", "18.53")
}

pub fn weather_service(server: &MockServer) -> WeatherService {
    let url = format!("{}/v1/forecast", server.uri());
    WeatherService::new(logger(), fetcher(), url)
}

pub fn place_service(server: &MockServer, api_key: Option<&str>) -> PlaceService {
    let url = format!("{}/reverse", server.uri());
    let api_key = api_key.map(str::to_string);
    PlaceService::new(logger(), fetcher(), url, api_key)
}
