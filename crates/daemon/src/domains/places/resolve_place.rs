use crate::{Coordinate, FetchError, JsonFetcher};
use async_trait::async_trait;
use serde::Deserialize;
use slog::{info, warn, Logger};
use std::{fmt, sync::Arc};

/// City or locality name for a coordinate. Empty when it could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceName(pub String);

impl PlaceName {
    pub fn new(name: impl Into<String>) -> Self {
        PlaceName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct ReverseGeocode {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    #[serde(default)]
    city: Option<String>,
}

#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn resolve_place(&self, coordinate: &Coordinate) -> Result<PlaceName, FetchError>;
}

pub struct PlaceService {
    pub logger: Logger,
    pub fetcher: Arc<JsonFetcher>,
    pub base_url: String,
    api_key: Option<String>,
}

impl PlaceService {
    pub fn new(
        logger: Logger,
        fetcher: Arc<JsonFetcher>,
        base_url: String,
        api_key: Option<String>,
    ) -> Self {
        PlaceService {
            logger,
            fetcher,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PlaceSource for PlaceService {
    /// Only transport failures are errors. A body that does not decode, or
    /// that names no city, resolves to an empty place.
    async fn resolve_place(&self, coordinate: &Coordinate) -> Result<PlaceName, FetchError> {
        info!(self.logger, "resolving place for {}", coordinate);
        let mut query = vec![
            ("lat", coordinate.latitude.as_str()),
            ("lon", coordinate.longitude.as_str()),
        ];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("api_key", key));
        }

        let body = self.fetcher.fetch_text(&self.base_url, &query).await?;
        Ok(place_from_body(&self.logger, &body))
    }
}

fn place_from_body(logger: &Logger, body: &str) -> PlaceName {
    match serde_json::from_str::<ReverseGeocode>(body) {
        Ok(geocode) => match geocode.address.city {
            Some(city) => PlaceName(city),
            None => {
                warn!(logger, "geocoding response has no city");
                PlaceName::default()
            }
        },
        Err(e) => {
            warn!(logger, "failed to decode geocoding response: {}", e);
            PlaceName::default()
        }
    }
}
