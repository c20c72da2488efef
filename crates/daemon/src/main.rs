use daemon::{
    build_sink, get_config_info, interval_duration, setup_logger, CyclePolicy, JsonFetcher,
    Normalizer, PlaceService, Scheduler, WeatherCodeTable, WeatherService, WindDirectionTable,
};
use slog::{info, warn};
use std::sync::Arc;
use weather_logger_core::shutdown_signal;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = get_config_info();
    let logger = setup_logger(&cli);

    let coordinate = cli.coordinate();
    if coordinate.is_incomplete() {
        warn!(
            logger,
            "latitude and longitude are not both set, requests will be sent without them. \
             Usage example: daemon --latitude=54.52 --longitude=18.53"
        );
    }

    info!(logger, "Weather Daemon starting...");
    info!(logger, "  Location: {}", coordinate);
    info!(logger, "  Weather URL: {}", cli.weather_url());
    info!(logger, "  Geocode URL: {}", cli.geocode_url());
    info!(logger, "  Data dir: {}", cli.data_dir());
    info!(logger, "  Sink: {:?}", cli.sink());
    info!(logger, "  Fetch interval: {} seconds", cli.sleep_interval());

    let fetcher = Arc::new(JsonFetcher::new(logger.clone(), &cli.user_agent())?);
    let weather = WeatherService::new(logger.clone(), fetcher.clone(), cli.weather_url());
    let places = PlaceService::new(
        logger.clone(),
        fetcher,
        cli.geocode_url(),
        cli.geocode_api_key.clone(),
    );
    let normalizer = Normalizer::new(
        logger.clone(),
        WeatherCodeTable::new(cli.language()),
        WindDirectionTable::default(),
    );
    let sink = build_sink(&cli).await?;
    let policy = CyclePolicy {
        continue_on_fetch_error: cli.continue_on_fetch_error(),
        on_storage_error: cli.on_storage_error(),
    };

    let scheduler = Scheduler::new(
        logger.clone(),
        coordinate,
        Arc::new(weather),
        Arc::new(places),
        normalizer,
        sink,
        policy,
        interval_duration(&cli),
    );

    tokio::select! {
        result = scheduler.run() => result?,
        _ = shutdown_signal() => info!(logger, "Shutdown signal received, stopping daemon"),
    }

    Ok(())
}
