use log::{error, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::{path::Path, str::FromStr, time::Duration};
use tokio::fs::create_dir_all;

use crate::{CompassPoint, WeatherRecord, DB_FILE_NAME};

const RECORD_COLUMNS: &str = "id, location, date_time, weather_code, description, \
                              temperature, wind_speed, wind_direction";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to create database directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored record {id} is invalid: {reason}")]
    InvalidRow { id: i64, reason: String },
    #[error("Database integrity check failed: {0}")]
    Integrity(String),
}

impl StoreError {
    /// True when the database could not be reached at all, as opposed to a
    /// statement that reached it and failed.
    pub fn is_connection(&self) -> bool {
        match self {
            StoreError::Directory { .. } | StoreError::Connect(_) => true,
            StoreError::Query(err) => matches!(
                err,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Configuration(_)
            ),
            _ => false,
        }
    }
}

/// Append-only SQLite store for weather records.
///
/// The daemon writes through it and the api reads through it; WAL mode lets
/// both processes share the file.
#[derive(Clone)]
pub struct WeatherStore {
    pool: SqlitePool,
}

impl WeatherStore {
    /// Open (creating if needed) `{data_dir}/weather.sqlite` and apply migrations.
    pub async fn new(data_dir: &str) -> Result<Self, StoreError> {
        let db_path = Path::new(data_dir).join(DB_FILE_NAME);

        if let Some(parent) = db_path.parent() {
            if let Err(source) = create_dir_all(parent).await {
                return Err(StoreError::Directory {
                    path: parent.display().to_string(),
                    source,
                });
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(StoreError::Connect)?
            .create_if_missing(true)
            .pragma("journal_mode", "WAL")
            .pragma("synchronous", "NORMAL")
            .pragma("busy_timeout", "5000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite database initialized at: {}", db_path.display());

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await?;
        if result != "ok" {
            return Err(StoreError::Integrity(result));
        }

        Ok(())
    }

    /// Flush the WAL into the main database file, used before shutdown.
    pub async fn checkpoint(&self) {
        match sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&self.pool)
            .await
        {
            Ok(_) => info!("WAL checkpoint completed successfully"),
            Err(e) => error!("WAL checkpoint failed: {}", e),
        }
    }

    /// Insert a record and return the id the database assigned to it.
    /// Any id already on `record` is ignored.
    pub async fn insert(&self, record: &WeatherRecord) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO weather (
                location, date_time, weather_code, description,
                temperature, wind_speed, wind_direction
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.city)
        .bind(&record.formatted_time)
        .bind(record.weather_code)
        .bind(record.description.as_deref())
        .bind(&record.temperature)
        .bind(&record.wind_speed)
        .bind(record.direction.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recently inserted record
    pub async fn latest(&self) -> Result<Option<WeatherRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM weather ORDER BY id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    pub async fn all(&self) -> Result<Vec<WeatherRecord>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {RECORD_COLUMNS} FROM weather ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_record).collect()
    }

    /// Records whose `date_time` lies in `[start, end]`.
    ///
    /// Bounds are Warsaw wall-clock strings in the record layout, so the
    /// comparison is a plain text comparison.
    pub async fn between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<WeatherRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM weather
             WHERE date_time BETWEEN ? AND ?
             ORDER BY id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &SqliteRow) -> Result<WeatherRecord, StoreError> {
    let id: i64 = row.try_get("id")?;
    let direction: String = row.try_get("wind_direction")?;
    let direction = match CompassPoint::from_str(&direction) {
        Ok(direction) => direction,
        Err(e) => {
            return Err(StoreError::InvalidRow {
                id,
                reason: e.to_string(),
            })
        }
    };

    Ok(WeatherRecord {
        id: Some(id),
        city: row.try_get("location")?,
        formatted_time: row.try_get("date_time")?,
        weather_code: row.try_get("weather_code")?,
        description: row.try_get("description")?,
        temperature: row.try_get("temperature")?,
        wind_speed: row.try_get("wind_speed")?,
        direction,
    })
}
