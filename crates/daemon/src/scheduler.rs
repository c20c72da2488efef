use crate::{
    Coordinate, FetchError, Normalizer, PlaceName, PlaceSource, RawWeatherObservation,
    RecordSink, SinkError, WeatherSource,
};
use clap::ValueEnum;
use slog::{error, info, warn, Logger};
use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use weather_logger_core::WeatherRecord;

/// Reaction to a record that could not be stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFailurePolicy {
    /// log it and keep running
    #[default]
    Log,
    /// stop the daemon
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePolicy {
    /// Store a zero-valued observation when the weather fetch fails instead of skipping the cycle
    pub continue_on_fetch_error: bool,
    pub on_storage_error: StorageFailurePolicy,
}

impl Default for CyclePolicy {
    fn default() -> Self {
        Self {
            continue_on_fetch_error: true,
            on_storage_error: StorageFailurePolicy::Log,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CycleError {
    #[error("cycle skipped, weather fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("record not stored: {0}")]
    Storage(#[from] SinkError),
}

pub struct Scheduler {
    logger: Logger,
    coordinate: Coordinate,
    weather: Arc<dyn WeatherSource>,
    places: Arc<dyn PlaceSource>,
    normalizer: Normalizer,
    sink: Arc<dyn RecordSink>,
    policy: CyclePolicy,
    period: Duration,
}

impl Scheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        logger: Logger,
        coordinate: Coordinate,
        weather: Arc<dyn WeatherSource>,
        places: Arc<dyn PlaceSource>,
        normalizer: Normalizer,
        sink: Arc<dyn RecordSink>,
        policy: CyclePolicy,
        period: Duration,
    ) -> Self {
        Self {
            logger,
            coordinate,
            weather,
            places,
            normalizer,
            sink,
            policy,
            period,
        }
    }

    /// Fetch, resolve, normalize and store once.
    ///
    /// Returns the record with its assigned id. Under `StorageFailurePolicy::Log`
    /// a storage failure is logged and the record comes back without an id.
    pub async fn run_cycle(&self) -> Result<WeatherRecord, CycleError> {
        let observation = match self.weather.fetch_weather(&self.coordinate).await {
            Ok(observation) => observation,
            Err(e) if self.policy.continue_on_fetch_error => {
                warn!(self.logger, "weather fetch failed: {}", e);
                info!(self.logger, "continuing with an empty observation");
                RawWeatherObservation::default()
            }
            Err(e) => return Err(CycleError::Fetch(e)),
        };

        let place = match self.places.resolve_place(&self.coordinate).await {
            Ok(place) => place,
            Err(e) => {
                warn!(self.logger, "place lookup failed: {}", e);
                PlaceName::default()
            }
        };

        let record = self.normalizer.normalize(&observation, &place);
        self.log_record(&record);

        let sink = self.sink.name();
        match self.sink.store(&record).await {
            Ok(id) => {
                info!(self.logger, "stored record {} in {}", id, sink);
                Ok(record.with_id(id))
            }
            Err(e) => match self.policy.on_storage_error {
                StorageFailurePolicy::Log => {
                    error!(self.logger, "failed to store record in {}: {}", sink, e);
                    Ok(record)
                }
                StorageFailurePolicy::Abort => Err(CycleError::Storage(e)),
            },
        }
    }

    /// Run cycles forever, the first one immediately.
    /// Only returns when a storage failure meets `StorageFailurePolicy::Abort`.
    pub async fn run(&self) -> Result<(), CycleError> {
        let seconds = self.period.as_secs();
        info!(self.logger, "{} seconds between data pulls", seconds);
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(_) => info!(self.logger, "cycle done, next in {} seconds", seconds),
                Err(e @ CycleError::Fetch(_)) => error!(self.logger, "{}", e),
                Err(e @ CycleError::Storage(_)) => {
                    error!(self.logger, "stopping: {}", e);
                    return Err(e);
                }
            }
        }
    }

    fn log_record(&self, record: &WeatherRecord) {
        info!(self.logger, "location: {}", record.city);
        info!(self.logger, "measured at: {}", record.formatted_time);
        match &record.description {
            Some(description) => info!(self.logger, "current weather: {}", description),
            None => info!(self.logger, "unknown weather code {}", record.weather_code),
        }
        info!(self.logger, "temperature: {} °C", record.temperature);
        info!(self.logger, "wind: {} km/h", record.wind_speed);
        info!(self.logger, "wind direction: {}", record.direction);
    }
}
