use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Compass-point label for a wind direction.
///
/// `Unknown` is used when a degree value falls outside every sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    Unknown,
}

impl CompassPoint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
            CompassPoint::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("not a compass point label: {0:?}")]
pub struct ParseCompassPointError(pub String);

impl FromStr for CompassPoint {
    type Err = ParseCompassPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(CompassPoint::N),
            "NE" => Ok(CompassPoint::NE),
            "E" => Ok(CompassPoint::E),
            "SE" => Ok(CompassPoint::SE),
            "S" => Ok(CompassPoint::S),
            "SW" => Ok(CompassPoint::SW),
            "W" => Ok(CompassPoint::W),
            "NW" => Ok(CompassPoint::NW),
            "Unknown" => Ok(CompassPoint::Unknown),
            other => Err(ParseCompassPointError(other.to_string())),
        }
    }
}

/// One normalized observation, produced once per fetch cycle.
///
/// This is both the unit of persistence and the body returned by the api.
/// Records are never updated after they are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeatherRecord {
    /// Assigned by the sink; `None` until the record has been stored
    pub id: Option<i64>,
    pub city: String,
    /// Warsaw wall-clock time, `YYYY-MM-DD HH:MM`; empty when the source time was unusable
    pub formatted_time: String,
    pub weather_code: i32,
    /// `None` when the weather code has no description
    pub description: Option<String>,
    /// Celsius, as decimal text
    pub temperature: String,
    /// km/h, as decimal text
    pub wind_speed: String,
    pub direction: CompassPoint,
}

impl WeatherRecord {
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CompassPoint; 9] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
        CompassPoint::Unknown,
    ];

    #[test]
    fn labels_parse_back() {
        for point in ALL {
            assert_eq!(point.as_str().parse::<CompassPoint>(), Ok(point));
        }
    }

    #[test]
    fn rejects_labels_outside_the_set() {
        assert!("".parse::<CompassPoint>().is_err());
        assert!("NNE".parse::<CompassPoint>().is_err());
        assert!("n".parse::<CompassPoint>().is_err());
    }

    #[test]
    fn serializes_as_plain_labels() {
        let record = WeatherRecord {
            id: Some(7),
            city: String::from("Gdynia"),
            formatted_time: String::from("2023-09-04 21:00"),
            weather_code: 99,
            description: None,
            temperature: String::from("18.2"),
            wind_speed: String::from("4.5"),
            direction: CompassPoint::SW,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"direction\":\"SW\""));
        assert!(json.contains("\"description\":null"));
        assert!(json.contains("\"id\":7"));
    }
}
