use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::WeatherReport;

/// Display-ready strings for every field the weather screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayReport {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub high: String,
    pub low: String,
    pub feels_like: Option<String>,
    pub icon_url: String,
    pub sunrise: String,
    pub sunset: String,
    pub humidity: String,
    pub pressure: String,
    pub wind: String,
    pub last_updated: String,
}

impl DisplayReport {
    pub fn new(report: &WeatherReport) -> Self {
        Self::in_timezone(report, &Local)
    }

    /// Render with `last_updated` expressed in `tz`.
    pub fn in_timezone<Tz>(report: &WeatherReport, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            location: report.location_label.clone(),
            temperature: celsius(report.temperature_c),
            condition: report.condition.clone(),
            high: format!("H:{}", celsius(report.high_c)),
            low: format!("L:{}", celsius(report.low_c)),
            feels_like: report.feels_like_c.map(celsius),
            icon_url: report.icon_url.clone(),
            sunrise: report.sunrise_local.clone(),
            sunset: report.sunset_local.clone(),
            humidity: format!("{}%", report.humidity_pct),
            pressure: format!("{} MB", report.pressure_hpa),
            wind: format!("{} KM/H", report.wind_kph),
            last_updated: last_updated(report.retrieved_at, tz),
        }
    }

    /// `(label, value)` rows in screen order.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        let mut rows = vec![
            ("Location", self.location.as_str()),
            ("Temperature", self.temperature.as_str()),
            ("Weather", self.condition.as_str()),
            ("High", self.high.as_str()),
            ("Low", self.low.as_str()),
        ];
        if let Some(feels_like) = &self.feels_like {
            rows.push(("Feels like", feels_like.as_str()));
        }
        rows.extend([
            ("Sunrise", self.sunrise.as_str()),
            ("Sunset", self.sunset.as_str()),
            ("Humidity", self.humidity.as_str()),
            ("Pressure", self.pressure.as_str()),
            ("Wind", self.wind.as_str()),
            ("Icon", self.icon_url.as_str()),
        ]);
        rows
    }
}

impl std::fmt::Display for DisplayReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{label:<12} {value}")?;
        }
        write!(f, "{}", self.last_updated)
    }
}

fn celsius(value: i64) -> String {
    format!("{value}°C")
}

fn last_updated<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("Last Updated: {}", at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S %Z"))
}
