use anyhow::anyhow;
use api::{app, build_app_state, get_config_info, get_log_level, setup_logger};
use axum::serve;
use futures::TryFutureExt;
use log::{error, info};
use std::{net::SocketAddr, str::FromStr};
use tokio::net::TcpListener;
use weather_logger_core::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info();
    let log_level = get_log_level(&cli);

    setup_logger()
        .level(log_level)
        .level_for("api", log_level)
        .level_for("weather_logger_core", log_level)
        .level_for("http_response", log_level)
        .level_for("http_request", log_level)
        .level_for("sqlx", log::LevelFilter::Warn)
        .apply()?;

    let data_dir = cli.data_dir();
    let socket_addr = SocketAddr::from_str(&format!("{}:{}", cli.host(), cli.port()))
        .map_err(|e| anyhow!("invalid address: {}", e))?;

    let listener = TcpListener::bind(socket_addr)
        .map_err(|e| anyhow!("error binding to socket: {}", e))
        .await?;

    info!("Weather API starting...");
    info!("  Listen: http://{}", socket_addr);
    info!("  Docs:   http://{}/docs", socket_addr);
    info!("  Data dir: {}", data_dir);

    let (app_state, weather_access) = build_app_state(&data_dir).await.map_err(|e| {
        error!("error building app: {}", e);
        e
    })?;

    serve(
        listener,
        app(app_state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutting down, checkpointing database");
    weather_access.checkpoint().await;

    Ok(())
}
