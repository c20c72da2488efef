use async_trait::async_trait;
use time::OffsetDateTime;
use weather_logger_core::{
    wall_clock, wall_clock_ceil, LocalTimeError, StoreError, WeatherRecord, WeatherStore,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query weather store: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to convert time range: {0}")]
    TimeRange(#[from] LocalTimeError),
}

#[async_trait]
pub trait WeatherData: Sync + Send {
    /// Record with the highest id
    async fn latest(&self) -> Result<Option<WeatherRecord>, Error>;
    async fn all(&self) -> Result<Vec<WeatherRecord>, Error>;
    /// Records observed within `[start, end]`, compared as Warsaw wall-clock time
    async fn between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<WeatherRecord>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

pub struct WeatherAccess {
    store: WeatherStore,
}

impl WeatherAccess {
    pub fn new(store: WeatherStore) -> Self {
        Self { store }
    }

    pub async fn checkpoint(&self) {
        self.store.checkpoint().await
    }
}

#[async_trait]
impl WeatherData for WeatherAccess {
    async fn latest(&self) -> Result<Option<WeatherRecord>, Error> {
        Ok(self.store.latest().await?)
    }

    async fn all(&self) -> Result<Vec<WeatherRecord>, Error> {
        Ok(self.store.all().await?)
    }

    async fn between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<WeatherRecord>, Error> {
        let start = wall_clock_ceil(start)?;
        let end = wall_clock(end)?;
        Ok(self.store.between(&start, &end).await?)
    }

    async fn health_check(&self) -> Result<(), Error> {
        Ok(self.store.health_check().await?)
    }
}
