//! Weather Logger Core Library
//!
//! Shared pieces for the daemon and api services:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - The canonical weather record and its SQLite store
//! - Warsaw wall-clock helpers
//! - Shutdown signal handling

mod config;
pub mod fs;
mod local_time;
mod record;
mod shutdown;
mod store;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::{data_file, ensure_dir};
pub use local_time::{
    reinterpret_local, wall_clock, wall_clock_ceil, LocalTimeError, RECORD_TIMEZONE,
    RECORD_TIME_FORMAT, SOURCE_TIME_FORMAT,
};
pub use record::{CompassPoint, ParseCompassPointError, WeatherRecord};
pub use shutdown::shutdown_signal;
pub use store::{StoreError, WeatherStore};

/// Application name used for XDG paths
pub const APP_NAME: &str = "weather-logger";

/// Default api port
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default daemon fetch interval (1 hour)
pub const DEFAULT_FETCH_INTERVAL: u64 = 3600;

/// Default directory holding the SQLite database and CSV output
pub const DEFAULT_DATA_DIR: &str = "./weather_data";

/// SQLite file name inside the data directory
pub const DB_FILE_NAME: &str = "weather.sqlite";
