use clap::{Parser, ValueEnum};
use reqwest::Client;
use serde::de::DeserializeOwned;
use slog::{debug, o, Drain, Level, Logger};
use std::{env, fmt, time::Duration};
use weather_logger_core::{
    data_file, find_config_file, load_config, ConfigSource, DEFAULT_DATA_DIR,
    DEFAULT_FETCH_INTERVAL,
};

use crate::{Language, StorageFailurePolicy};

pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODE_URL: &str = "https://geocode.maps.co/reverse";

/// Where records are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Sqlite,
    Csv,
}

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Weather Daemon - Fetches current weather for one location and stores it"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $WEATHER_DAEMON_CONFIG, ./daemon.toml,
    /// $XDG_CONFIG_HOME/weather-logger/daemon.toml, /etc/weather-logger/daemon.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "WEATHER_DAEMON_LEVEL")]
    pub level: Option<String>,

    /// Latitude of the observed location, e.g. 54.52
    #[arg(long, env = "WEATHER_DAEMON_LATITUDE")]
    pub latitude: Option<String>,

    /// Longitude of the observed location, e.g. 18.53
    #[arg(long, env = "WEATHER_DAEMON_LONGITUDE")]
    pub longitude: Option<String>,

    /// Fetch interval in seconds
    #[arg(short, long, env = "WEATHER_DAEMON_SLEEP_INTERVAL")]
    pub sleep_interval: Option<u64>,

    /// Directory holding the SQLite database or the CSV file
    #[arg(short, long, env = "WEATHER_DAEMON_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Storage backend for fetched records
    #[arg(long, value_enum, env = "WEATHER_DAEMON_SINK")]
    pub sink: Option<SinkKind>,

    /// CSV file name inside the data directory (csv sink only)
    #[arg(long, env = "WEATHER_DAEMON_CSV_FILE")]
    pub csv_file: Option<String>,

    /// Current-weather endpoint
    #[arg(long, env = "WEATHER_DAEMON_WEATHER_URL")]
    pub weather_url: Option<String>,

    /// Reverse geocoding endpoint
    #[arg(long, env = "WEATHER_DAEMON_GEOCODE_URL")]
    pub geocode_url: Option<String>,

    /// API key for the reverse geocoding endpoint
    #[arg(long, env = "WEATHER_DAEMON_GEOCODE_API_KEY")]
    pub geocode_api_key: Option<String>,

    /// HTTP User-Agent header for outbound requests
    #[arg(short, long, env = "WEATHER_DAEMON_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Store a zero-valued observation when the weather fetch fails (true)
    /// or skip the cycle (false)
    #[arg(long, env = "WEATHER_DAEMON_CONTINUE_ON_FETCH_ERROR")]
    pub continue_on_fetch_error: Option<bool>,

    /// What to do when a record cannot be stored
    #[arg(long, value_enum, env = "WEATHER_DAEMON_ON_STORAGE_ERROR")]
    pub on_storage_error: Option<StorageFailurePolicy>,

    /// Language of weather descriptions
    #[arg(long, value_enum, env = "WEATHER_DAEMON_LANGUAGE")]
    pub language: Option<Language>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude.clone().unwrap_or_default(),
            longitude: self.longitude.clone().unwrap_or_default(),
        }
    }

    /// Floored at one second
    pub fn sleep_interval(&self) -> u64 {
        self.sleep_interval.unwrap_or(DEFAULT_FETCH_INTERVAL).max(1)
    }

    pub fn data_dir(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    pub fn sink(&self) -> SinkKind {
        self.sink.unwrap_or_default()
    }

    pub fn csv_path(&self) -> String {
        let file_name = self.csv_file.as_deref().unwrap_or("data.csv");
        data_file(&self.data_dir(), file_name)
            .to_string_lossy()
            .to_string()
    }

    pub fn weather_url(&self) -> String {
        self.weather_url
            .clone()
            .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string())
    }

    pub fn geocode_url(&self) -> String {
        self.geocode_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_string())
    }

    pub fn user_agent(&self) -> String {
        match &self.user_agent {
            Some(user_agent) => user_agent.clone(),
            None => format!("weather-logger-daemon/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn continue_on_fetch_error(&self) -> bool {
        self.continue_on_fetch_error.unwrap_or(true)
    }

    pub fn on_storage_error(&self) -> StorageFailurePolicy {
        self.on_storage_error.unwrap_or_default()
    }

    pub fn language(&self) -> Language {
        self.language.unwrap_or_default()
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    merge_config(Cli::parse())
}

fn merge_config(cli_args: Cli) -> Cli {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("WEATHER_DAEMON_CONFIG", "daemon.toml")
    };

    let file_config: Cli = match load_config(&source) {
        Ok(config) => config,
        Err(e) => {
            // the logger is configured from this result, so stderr is all there is
            eprintln!("ignoring config file {}: {:#}", source, e);
            Cli::default()
        }
    };

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        latitude: cli_args.latitude.or(file_config.latitude),
        longitude: cli_args.longitude.or(file_config.longitude),
        sleep_interval: cli_args.sleep_interval.or(file_config.sleep_interval),
        data_dir: cli_args.data_dir.or(file_config.data_dir),
        sink: cli_args.sink.or(file_config.sink),
        csv_file: cli_args.csv_file.or(file_config.csv_file),
        weather_url: cli_args.weather_url.or(file_config.weather_url),
        geocode_url: cli_args.geocode_url.or(file_config.geocode_url),
        geocode_api_key: cli_args.geocode_api_key.or(file_config.geocode_api_key),
        user_agent: cli_args.user_agent.or(file_config.user_agent),
        continue_on_fetch_error: cli_args
            .continue_on_fetch_error
            .or(file_config.continue_on_fetch_error),
        on_storage_error: cli_args.on_storage_error.or(file_config.on_storage_error),
        language: cli_args.language.or(file_config.language),
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Latitude/longitude pair as given at startup. Values are passed to the
/// endpoints verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.latitude.is_empty() || self.longitude.is_empty()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Shared HTTP client for the JSON endpoints. One GET per call, no retries.
pub struct JsonFetcher {
    logger: Logger,
    client: Client,
}

impl JsonFetcher {
    pub fn new(logger: Logger, user_agent: &str) -> Result<JsonFetcher, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { logger, client })
    }

    /// GET `url` with `query` and return the body text.
    /// Transport errors and non-success statuses are `FetchError::Network`.
    pub async fn fetch_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        debug!(self.logger, "requesting: {} {:?}", url, query);
        let network = |reason: String| FetchError::Network {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| network(format!("error sending request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| network(format!("error reading body: {}", e)))?;

        if !status.is_success() {
            let reason = format!("status {}: {}", status, truncate_body(&body));
            return Err(network(reason));
        }

        Ok(body)
    }

    /// `fetch_text` followed by a JSON decode into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let body = self.fetch_text(url, query).await?;
        match serde_json::from_str(&body) {
            Ok(decoded) => Ok(decoded),
            Err(e) => Err(FetchError::Decode {
                url: url.to_string(),
                reason: format!("{} in {}", e, truncate_body(&body)),
            }),
        }
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

pub fn interval_duration(cli: &Cli) -> Duration {
    Duration::from_secs(cli.sleep_interval())
}
