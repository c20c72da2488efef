use crate::helpers::{gdynia, logger, place_service, respond, weather_service, FORECAST_BODY};
use daemon::{CyclePolicy, Normalizer, Scheduler, SqliteSink, WeatherCodeTable, WindDirectionTable};
use std::{sync::Arc, time::Duration};
use weather_logger_core::{CompassPoint, WeatherStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

fn scheduler(server: &MockServer, store: WeatherStore) -> Scheduler {
    let normalizer = Normalizer::new(
        logger(),
        WeatherCodeTable::default(),
        WindDirectionTable::default(),
    );
    Scheduler::new(
        logger(),
        gdynia(),
        Arc::new(weather_service(server)),
        Arc::new(place_service(server, None)),
        normalizer,
        Arc::new(SqliteSink::new(store)),
        CyclePolicy::default(),
        Duration::from_secs(3600),
    )
}

#[tokio::test]
async fn undecodable_geocode_body_still_stores_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(respond(200, FORECAST_BODY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(respond(200, "<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();
    let store = WeatherStore::new(path).await.unwrap();
    let scheduler = scheduler(&server, store.clone());

    let record = scheduler.run_cycle().await.unwrap();

    assert_eq!(record.city, "");
    assert_eq!(record.formatted_time, "2023-09-04 21:00");
    assert_eq!(record.description.as_deref(), Some("mostly clear"));
    assert_eq!(record.direction, CompassPoint::SW);
    assert!(record.id.is_some());

    let stored = store.latest().await.unwrap().unwrap();
    assert_eq!(stored, record);
}
