use crate::{PlaceName, RawWeatherObservation, WeatherCodeTable, WindDirectionTable};
use slog::{warn, Logger};
use weather_logger_core::{reinterpret_local, WeatherRecord};

/// Turns a raw observation plus a place name into the record that gets stored.
pub struct Normalizer {
    codes: WeatherCodeTable,
    directions: WindDirectionTable,
    logger: Logger,
}

impl Normalizer {
    pub fn new(logger: Logger, codes: WeatherCodeTable, directions: WindDirectionTable) -> Self {
        Normalizer {
            codes,
            directions,
            logger,
        }
    }

    pub fn normalize(
        &self,
        observation: &RawWeatherObservation,
        place: &PlaceName,
    ) -> WeatherRecord {
        let formatted_time = match reinterpret_local(&observation.time) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(self.logger, "storing record without a time: {}", e);
                String::new()
            }
        };

        WeatherRecord {
            id: None,
            city: place.as_str().to_string(),
            formatted_time,
            weather_code: observation.weather_code,
            description: self
                .codes
                .describe(observation.weather_code)
                .map(str::to_string),
            // shortest round-trip rendering, 18.0 prints as "18"
            temperature: observation.temperature.to_string(),
            wind_speed: observation.wind_speed.to_string(),
            direction: self.directions.direction(observation.wind_direction),
        }
    }
}
