use crate::{Coordinate, FetchError, JsonFetcher};
use async_trait::async_trait;
use serde::Deserialize;
use slog::{debug, info, Logger};
use std::sync::Arc;

/// Current conditions as reported by open-meteo, before normalization.
///
/// `Default` is the zero-valued observation used when a fetch fails and the
/// cycle continues anyway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWeatherObservation {
    /// degrees Celsius
    pub temperature: f64,
    /// km/h
    pub wind_speed: f64,
    /// degrees, meteorological convention
    pub wind_direction: f64,
    pub weather_code: i32,
    /// `YYYY-MM-DDTHH:MM`
    pub time: String,
    pub is_day: bool,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
    #[serde(default)]
    is_day: u8,
    time: String,
}

impl From<CurrentWeather> for RawWeatherObservation {
    fn from(value: CurrentWeather) -> Self {
        RawWeatherObservation {
            temperature: value.temperature,
            wind_speed: value.windspeed,
            wind_direction: value.winddirection,
            weather_code: value.weathercode,
            time: value.time,
            is_day: value.is_day != 0,
        }
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_weather(
        &self,
        coordinate: &Coordinate,
    ) -> Result<RawWeatherObservation, FetchError>;
}

pub struct WeatherService {
    pub logger: Logger,
    pub fetcher: Arc<JsonFetcher>,
    pub base_url: String,
}

impl WeatherService {
    pub fn new(logger: Logger, fetcher: Arc<JsonFetcher>, base_url: String) -> Self {
        WeatherService {
            logger,
            fetcher,
            base_url,
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherService {
    async fn fetch_weather(
        &self,
        coordinate: &Coordinate,
    ) -> Result<RawWeatherObservation, FetchError> {
        info!(self.logger, "fetching weather for {}", coordinate);
        let query = [
            ("latitude", coordinate.latitude.as_str()),
            ("longitude", coordinate.longitude.as_str()),
            ("current_weather", "true"),
        ];
        let response: ForecastResponse = self.fetcher.fetch_json(&self.base_url, &query).await?;
        debug!(self.logger, "current weather: {:?}", response.current_weather);

        Ok(response.current_weather.into())
    }
}
