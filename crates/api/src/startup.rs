use crate::{health, latest_weather, routes, weather_records, WeatherAccess, WeatherData};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use weather_logger_core::{CompassPoint, WeatherRecord, WeatherStore};

#[derive(Clone)]
pub struct AppState {
    pub weather_db: Arc<dyn WeatherData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::weather::latest_weather,
        routes::weather::weather_records,
        routes::weather::health,
    ),
    components(
        schemas(
            WeatherRecord,
            CompassPoint,
            routes::weather::Health
        )
    ),
    tags(
        (name = "weather logger api", description = "a read-only RESTful api over periodically fetched weather records")
    )
)]
struct ApiDoc;

/// Open the store the daemon writes to. Also returns the concrete handle so
/// main can checkpoint it on shutdown.
pub async fn build_app_state(
    data_dir: &str,
) -> Result<(AppState, Arc<WeatherAccess>), anyhow::Error> {
    let store = WeatherStore::new(data_dir)
        .await
        .map_err(|e| anyhow!("error setting up SQLite database: {}", e))?;
    let weather_access = Arc::new(WeatherAccess::new(store));

    Ok((
        AppState {
            weather_db: weather_access.clone(),
        },
        weather_access,
    ))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(latest_weather))
        .route("/weather/latest", get(latest_weather))
        .route("/weather", get(weather_records))
        .route("/health", get(health))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", method, path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(
        target: "http_response",
        "response, {} {} code: {}, time: {}",
        method,
        path,
        response.status().as_str(),
        response_time
    );

    response
}
