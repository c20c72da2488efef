use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use weather_logger_core::WeatherRecord;

#[derive(Clone, Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimeRange {
    /// RFC3339 lower bound, inclusive
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[param(value_type = Option<String>, example = "2023-09-04T19:00:00Z")]
    pub start_time: Option<OffsetDateTime>,
    /// RFC3339 upper bound, inclusive
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[param(value_type = Option<String>, example = "2023-09-04T21:00:00Z")]
    pub end_time: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Health {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/weather/latest",
    responses(
        (status = OK, description = "Most recently stored record", content_type = "application/json", body = WeatherRecord),
        (status = NOT_FOUND, description = "No records stored yet"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the weather store")
    ))]
pub async fn latest_weather(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WeatherRecord>, (StatusCode, String)> {
    let latest = state.weather_db.latest().await.map_err(|e| {
        error!("error reading latest record: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("failed to read weather records"),
        )
    })?;

    match latest {
        Some(record) => Ok(Json(record)),
        None => Err((
            StatusCode::NOT_FOUND,
            String::from("no weather records stored"),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/weather",
    params(TimeRange),
    responses(
        (status = OK, description = "Records within the time range, or all records when a bound is missing", content_type = "application/json", body = Vec<WeatherRecord>),
        (status = BAD_REQUEST, description = "A bound is not a valid RFC3339 timestamp"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the weather store")
    ))]
pub async fn weather_records(
    State(state): State<Arc<AppState>>,
    range: Result<Query<TimeRange>, QueryRejection>,
) -> Result<Json<Vec<WeatherRecord>>, (StatusCode, String)> {
    let Query(range) = range.map_err(|e| {
        error!("invalid time range: {}", e);
        (StatusCode::BAD_REQUEST, format!("invalid time range: {}", e))
    })?;

    let records = match (range.start_time, range.end_time) {
        (Some(start), Some(end)) => state.weather_db.between(start, end).await,
        _ => state.weather_db.all().await,
    }
    .map_err(|e| {
        error!("error reading weather records: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("failed to read weather records"),
        )
    })?;

    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Weather store is reachable", body = Health),
        (status = SERVICE_UNAVAILABLE, description = "Weather store failed its checks")
    ))]
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Health>, (StatusCode, String)> {
    state.weather_db.health_check().await.map_err(|e| {
        error!("health check failed: {}", e);
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })?;

    Ok(Json(Health {
        status: String::from("ok"),
    }))
}
