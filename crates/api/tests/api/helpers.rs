use api::{app, AppState, Error, WeatherData};
use async_trait::async_trait;
use axum::Router;
use mockall::mock;
use std::sync::Arc;
use time::OffsetDateTime;
use weather_logger_core::WeatherRecord;

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(weather_db: Arc<dyn WeatherData>) -> TestApp {
    let app_state = AppState { weather_db };
    TestApp {
        app: app(app_state),
    }
}

mock! {
    pub WeatherAccess {}
    #[async_trait]
    impl WeatherData for WeatherAccess {
        async fn latest(&self) -> Result<Option<WeatherRecord>, Error>;
        async fn all(&self) -> Result<Vec<WeatherRecord>, Error>;
        async fn between(
            &self,
            start: OffsetDateTime,
            end: OffsetDateTime,
        ) -> Result<Vec<WeatherRecord>, Error>;
        async fn health_check(&self) -> Result<(), Error>;
    }
}
