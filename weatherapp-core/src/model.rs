use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// City used when no location fix is available and nothing else is configured.
pub const DEFAULT_CITY: &str = "Ottawa";

/// Place reference driving one weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationQuery {
    ByCity(String),
    ByCoordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    /// Build a city query from raw user input, trimming surrounding whitespace.
    pub fn city(name: impl AsRef<str>) -> Self {
        LocationQuery::ByCity(name.as_ref().trim().to_string())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::ByCoordinates { latitude, longitude }
    }
}

impl Default for LocationQuery {
    fn default() -> Self {
        LocationQuery::ByCity(DEFAULT_CITY.to_string())
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::ByCity(name) => f.write_str(name),
            LocationQuery::ByCoordinates { latitude, longitude } => {
                write!(f, "({latitude}, {longitude})")
            }
        }
    }
}

/// Normalized result of one successful lookup.
///
/// Only the response parser constructs these, and only from a payload in which
/// every required field was present and well-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// `"<city>, <country code>"`.
    pub location_label: String,
    pub temperature_c: i64,
    /// Short weather category, e.g. `"Rain"`.
    pub condition: String,
    pub high_c: i64,
    pub low_c: i64,
    pub feels_like_c: Option<i64>,
    pub icon_url: String,
    pub humidity_pct: i64,
    pub pressure_hpa: i64,
    pub wind_kph: i64,
    /// Sunrise as `HH:MM:SS <zone>` in the local timezone of this machine.
    pub sunrise_local: String,
    pub sunset_local: String,
    pub retrieved_at: DateTime<Utc>,
}
