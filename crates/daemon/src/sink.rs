use crate::{Cli, SinkKind};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{sync::Mutex, task::spawn_blocking};
use weather_logger_core::{ensure_dir, StoreError, WeatherRecord, WeatherStore};

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("storage unavailable: {0}")]
    Connection(String),
    #[error("failed to write record: {0}")]
    Write(String),
}

impl From<StoreError> for SinkError {
    fn from(err: StoreError) -> Self {
        if err.is_connection() {
            SinkError::Connection(err.to_string())
        } else {
            SinkError::Write(err.to_string())
        }
    }
}

/// Append-only destination for normalized records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist `record` and return the id it was stored under.
    async fn store(&self, record: &WeatherRecord) -> Result<i64, SinkError>;

    fn name(&self) -> &'static str;
}

pub struct SqliteSink {
    store: WeatherStore,
}

impl SqliteSink {
    pub fn new(store: WeatherStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecordSink for SqliteSink {
    async fn store(&self, record: &WeatherRecord) -> Result<i64, SinkError> {
        Ok(self.store.insert(record).await?)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    location: &'a str,
    date_time: &'a str,
    weather_code: i32,
    description: Option<&'a str>,
    temperature: &'a str,
    wind_speed: &'a str,
    wind_direction: &'a str,
}

/// One headerless CSV line per record, file reopened for every write.
pub struct CsvSink {
    path: PathBuf,
    last_id: Mutex<i64>,
}

impl CsvSink {
    /// Ids continue after the lines already in `path`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let existing = match fs::File::open(&path) {
            Ok(file) => BufReader::new(file).lines().count(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                let reason = format!("failed to open {}: {}", path.display(), e);
                return Err(SinkError::Connection(reason));
            }
        };

        Ok(Self {
            path,
            last_id: Mutex::new(existing as i64),
        })
    }
}

fn append_line(path: &Path, id: i64, record: &WeatherRecord) -> Result<(), SinkError> {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            let reason = format!("failed to open {}: {}", path.display(), e);
            return Err(SinkError::Connection(reason));
        }
    };

    let row = CsvRow {
        id,
        location: &record.city,
        date_time: &record.formatted_time,
        weather_code: record.weather_code,
        description: record.description.as_deref(),
        temperature: &record.temperature,
        wind_speed: &record.wind_speed,
        wind_direction: record.direction.as_str(),
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer
        .serialize(row)
        .map_err(|e| SinkError::Write(e.to_string()))?;
    writer.flush().map_err(|e| SinkError::Write(e.to_string()))
}

#[async_trait]
impl RecordSink for CsvSink {
    /// Writes run on the blocking pool; the id lock keeps lines in id order.
    async fn store(&self, record: &WeatherRecord) -> Result<i64, SinkError> {
        let mut last_id = self.last_id.lock().await;
        let id = *last_id + 1;

        let path = self.path.clone();
        let record = record.clone();
        spawn_blocking(move || append_line(&path, id, &record))
            .await
            .map_err(|e| SinkError::Write(format!("csv writer stopped: {}", e)))??;

        *last_id = id;
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Open the sink selected by `cli.sink()`, creating the data directory if needed.
pub async fn build_sink(cli: &Cli) -> Result<Arc<dyn RecordSink>, anyhow::Error> {
    match cli.sink() {
        SinkKind::Sqlite => {
            let store = WeatherStore::new(&cli.data_dir())
                .await
                .map_err(|e| anyhow!("failed to open weather database: {}", e))?;
            Ok(Arc::new(SqliteSink::new(store)))
        }
        SinkKind::Csv => {
            ensure_dir(cli.data_dir())?;
            Ok(Arc::new(CsvSink::new(cli.csv_path())?))
        }
    }
}
