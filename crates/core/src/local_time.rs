//! Wall-clock handling for record timestamps.
//!
//! Records carry Warsaw civil time at minute precision, independent of where
//! the observed coordinate is.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{Europe, Tz};
use log::warn;
use time::OffsetDateTime;

pub const RECORD_TIMEZONE: Tz = Europe::Warsaw;

/// Layout of the observation time sent by the weather endpoint
pub const SOURCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Layout of `WeatherRecord::formatted_time` and of the `date_time` column
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const SECONDS_PER_MINUTE: i64 = 60;

#[derive(thiserror::Error, Debug)]
pub enum LocalTimeError {
    #[error("Failed to parse observation time {raw:?}: {source}")]
    Parse {
        raw: String,
        source: chrono::ParseError,
    },
    #[error("Timestamp out of range: {0}")]
    OutOfRange(OffsetDateTime),
}

/// Read `raw` (`YYYY-MM-DDTHH:MM`) as Warsaw wall-clock time and render it as
/// `YYYY-MM-DD HH:MM`.
///
/// Times inside the autumn fold resolve to the earlier instant. Times inside
/// the spring gap have no Warsaw instant; they keep their wall-clock reading.
pub fn reinterpret_local(raw: &str) -> Result<String, LocalTimeError> {
    let naive = match NaiveDateTime::parse_from_str(raw, SOURCE_TIME_FORMAT) {
        Ok(naive) => naive,
        Err(source) => {
            return Err(LocalTimeError::Parse {
                raw: raw.to_string(),
                source,
            })
        }
    };

    let formatted = match RECORD_TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.format(RECORD_TIME_FORMAT).to_string(),
        LocalResult::Ambiguous(earliest, _) => earliest.format(RECORD_TIME_FORMAT).to_string(),
        LocalResult::None => {
            warn!("{} is skipped by {} clocks", naive, RECORD_TIMEZONE);
            naive.format(RECORD_TIME_FORMAT).to_string()
        }
    };

    Ok(formatted)
}

/// Render an instant as Warsaw wall-clock time, truncated to the minute.
/// Use for the upper bound of an inclusive range.
pub fn wall_clock(instant: OffsetDateTime) -> Result<String, LocalTimeError> {
    render_utc_seconds(instant.unix_timestamp(), instant)
}

/// Render an instant as Warsaw wall-clock time, rounded up to the next whole
/// minute when it has seconds. Use for the lower bound of an inclusive range,
/// so records from before the instant are not matched.
pub fn wall_clock_ceil(instant: OffsetDateTime) -> Result<String, LocalTimeError> {
    let seconds = instant.unix_timestamp();
    let past_minute = seconds.rem_euclid(SECONDS_PER_MINUTE);
    let ceiled = if past_minute == 0 && instant.nanosecond() == 0 {
        seconds
    } else {
        seconds - past_minute + SECONDS_PER_MINUTE
    };
    render_utc_seconds(ceiled, instant)
}

fn render_utc_seconds(seconds: i64, instant: OffsetDateTime) -> Result<String, LocalTimeError> {
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or(LocalTimeError::OutOfRange(instant))?;
    Ok(utc
        .with_timezone(&RECORD_TIMEZONE)
        .format(RECORD_TIME_FORMAT)
        .to_string())
}
