use clap::ValueEnum;
use std::collections::HashMap;
use weather_logger_core::CompassPoint;

/// Language of the weather code descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
}

// WMO weather interpretation codes as reported by open-meteo
const ENGLISH: &[(i32, &str)] = &[
    (0, "clear sky"),
    (1, "mostly clear"),
    (2, "partly cloudy"),
    (3, "overcast"),
    (45, "fog and rime"),
    (48, "fog and rime"),
    (51, "drizzle: light intensity"),
    (53, "drizzle: moderate intensity"),
    (55, "drizzle: dense intensity"),
    (56, "freezing drizzle: light intensity"),
    (57, "freezing drizzle: dense intensity"),
    (61, "rain: slight intensity"),
    (63, "rain: moderate intensity"),
    (65, "rain: heavy intensity"),
    (66, "freezing rain: light intensity"),
    (67, "freezing rain: heavy intensity"),
    (71, "snow fall: slight intensity"),
    (73, "snow fall: moderate intensity"),
    (75, "snow fall: heavy intensity"),
    (77, "snow grains"),
    (80, "rain showers: slight intensity"),
    (81, "rain showers: moderate intensity"),
    (82, "rain showers: violent intensity"),
    (85, "snow showers: slight intensity"),
    (86, "snow showers: heavy intensity"),
    (95, "thunderstorm: slight intensity"),
    (96, "thunderstorm with slight hail"),
    (99, "thunderstorm with heavy hail"),
];

const POLISH: &[(i32, &str)] = &[
    (0, "Bezchmurne niebo"),
    (1, "Przeważnie bezchmurne"),
    (2, "Częściowo zachmurzone"),
    (3, "Zachmurzone"),
    (45, "Mgła i szadź"),
    (48, "Mgła i szadź"),
    (51, "Mżawka: Słaba intensywność"),
    (53, "Mżawka: Umiarkowana intensywność"),
    (55, "Mżawka: Gęsta intensywność"),
    (56, "Marznąca mżawka: Słaba intensywność"),
    (57, "Marznąca mżawka: Gęsta intensywność"),
    (61, "Deszcz: Słaba intensywność"),
    (63, "Deszcz: Umiarkowana intensywność"),
    (65, "Deszcz: Duża intensywność"),
    (66, "Marznący deszcz: Słaba intensywność"),
    (67, "Marznący deszcz: Duża intensywność"),
    (71, "Opady śniegu: Słaba intensywność"),
    (73, "Opady śniegu: Umiarkowana intensywność"),
    (75, "Opady śniegu: Duża intensywność"),
    (77, "Kryształki śniegu"),
    (80, "Przelotne opady deszczu: Słaba intensywność"),
    (81, "Przelotne opady deszczu: Umiarkowana intensywność"),
    (82, "Przelotne opady deszczu: Wysoka intensywność"),
    (85, "Przelotne opady śniegu: Słaba intensywność"),
    (86, "Przelotne opady śniegu: Duża intensywność"),
    (95, "Burza: Słaba intensywność"),
    (96, "Burza z drobnym gradem"),
    (99, "Burza z dużym gradem"),
];

/// Weather code -> human readable description. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct WeatherCodeTable {
    descriptions: HashMap<i32, &'static str>,
}

impl WeatherCodeTable {
    pub fn new(language: Language) -> Self {
        let entries = match language {
            Language::En => ENGLISH,
            Language::Pl => POLISH,
        };
        Self {
            descriptions: entries.iter().copied().collect(),
        }
    }

    /// `None` for codes outside the table
    pub fn describe(&self, code: i32) -> Option<&'static str> {
        self.descriptions.get(&code).copied()
    }
}

impl Default for WeatherCodeTable {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

/// Half-open `[start, end)` range of degrees mapped to a compass point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSector {
    pub start: u16,
    pub end: u16,
    pub point: CompassPoint,
}

impl WindSector {
    pub fn contains(&self, degree: f64) -> bool {
        degree >= f64::from(self.start) && degree < f64::from(self.end)
    }
}

const fn sector(start: u16, end: u16, point: CompassPoint) -> WindSector {
    WindSector { start, end, point }
}

// North is split across the wrap-around. Order matters: lookups take the first hit.
pub const WIND_SECTORS: [WindSector; 9] = [
    sector(335, 360, CompassPoint::N),
    sector(295, 335, CompassPoint::NW),
    sector(245, 295, CompassPoint::W),
    sector(205, 245, CompassPoint::SW),
    sector(155, 205, CompassPoint::S),
    sector(115, 155, CompassPoint::SE),
    sector(65, 115, CompassPoint::E),
    sector(25, 65, CompassPoint::NE),
    sector(0, 25, CompassPoint::N),
];

#[derive(Debug, Clone, Copy)]
pub struct WindDirectionTable {
    sectors: &'static [WindSector],
}

impl WindDirectionTable {
    /// First sector containing `degree`, `CompassPoint::Unknown` when none does
    /// (negative, 360 and above, NaN).
    pub fn direction(&self, degree: f64) -> CompassPoint {
        self.sectors
            .iter()
            .find(|sector| sector.contains(degree))
            .map(|sector| sector.point)
            .unwrap_or(CompassPoint::Unknown)
    }
}

impl Default for WindDirectionTable {
    fn default() -> Self {
        Self {
            sectors: &WIND_SECTORS,
        }
    }
}
