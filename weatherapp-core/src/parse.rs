//! Mapping of the current-weather JSON payload into a [`WeatherReport`].
//!
//! Temperatures, humidity and pressure are truncated toward zero so the screen
//! shows `23°C` for `23.9`. Wind is the exception: m/s is converted to km/h and
//! rounded. Sunrise and sunset are rendered in the timezone of the machine
//! running the lookup, not the timezone of the queried city.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;

use crate::{error::ParseError, model::WeatherReport};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn/";
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S %Z";

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

/// Parse a payload, rendering times in the local timezone and stamping it now.
pub fn parse(raw: &str) -> Result<WeatherReport, ParseError> {
    parse_at(raw, &Local, Utc::now())
}

/// Parse a payload with an explicit display timezone and retrieval time.
pub fn parse_at<Tz>(
    raw: &str,
    tz: &Tz,
    retrieved_at: DateTime<Utc>,
) -> Result<WeatherReport, ParseError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parsed: OwCurrentResponse = serde_json::from_str(raw)?;

    let conditions = parsed.weather.first().ok_or(ParseError::NoConditions)?;
    let sunrise_local = time_of_day("sunrise", parsed.sys.sunrise, tz)?;
    let sunset_local = time_of_day("sunset", parsed.sys.sunset, tz)?;

    Ok(WeatherReport {
        location_label: format!("{}, {}", parsed.name, parsed.sys.country),
        temperature_c: truncate(parsed.main.temp),
        condition: conditions.main.clone(),
        high_c: truncate(parsed.main.temp_max),
        low_c: truncate(parsed.main.temp_min),
        feels_like_c: parsed.main.feels_like.map(truncate),
        icon_url: icon_url(&conditions.icon),
        humidity_pct: truncate(parsed.main.humidity),
        pressure_hpa: truncate(parsed.main.pressure),
        wind_kph: mps_to_kph(parsed.wind.speed),
        sunrise_local,
        sunset_local,
        retrieved_at,
    })
}

/// Large (4x) rendition of a condition icon.
pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE_URL}{code}@4x.png")
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn mps_to_kph(speed: f64) -> i64 {
    (speed * 3.6).round() as i64
}

fn time_of_day<Tz>(field: &'static str, epoch_secs: i64, tz: &Tz) -> Result<String, ParseError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(epoch_secs, 0)
        .ok_or(ParseError::Timestamp { field, value: epoch_secs })?;

    Ok(utc.with_timezone(tz).format(TIME_OF_DAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "name": "Ottawa",
            "main": {
                "temp": 21.8,
                "temp_max": 23.0,
                "temp_min": 19.0,
                "feels_like": 21.2,
                "humidity": 55,
                "pressure": 1012
            },
            "weather": [{ "main": "Clouds", "icon": "04d", "description": "broken clouds" }],
            "wind": { "speed": 5.0, "deg": 250 },
            "sys": { "country": "CA", "sunrise": 1690000000, "sunset": 1690040000 },
            "cod": 200
        })
    }

    fn retrieved() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 7, 22, 12, 0, 0).unwrap()
    }

    fn parse_utc(value: &serde_json::Value) -> Result<WeatherReport, ParseError> {
        parse_at(&value.to_string(), &Utc, retrieved())
    }

    #[test]
    fn parses_sample_payload() {
        let report = parse_utc(&sample()).expect("sample must parse");

        assert_eq!(report.location_label, "Ottawa, CA");
        assert_eq!(report.temperature_c, 21);
        assert_eq!(report.condition, "Clouds");
        assert_eq!(report.high_c, 23);
        assert_eq!(report.low_c, 19);
        assert_eq!(report.feels_like_c, Some(21));
        assert_eq!(report.humidity_pct, 55);
        assert_eq!(report.pressure_hpa, 1012);
        assert_eq!(report.wind_kph, 18);
        assert!(report.icon_url.ends_with("04d@4x.png"));
        assert_eq!(report.icon_url, "https://openweathermap.org/img/wn/04d@4x.png");
        assert_eq!(report.sunrise_local, "04:26:40 UTC");
        assert_eq!(report.sunset_local, "15:33:20 UTC");
        assert_eq!(report.retrieved_at, retrieved());
    }

    #[test]
    fn temperatures_truncate_but_wind_rounds() {
        let mut payload = sample();
        payload["main"]["temp"] = json!(23.9);
        payload["main"]["temp_min"] = json!(-3.7);
        payload["wind"]["speed"] = json!(4.3); // 15.48 km/h
        let report = parse_utc(&payload).unwrap();
        assert_eq!(report.temperature_c, 23);
        assert_eq!(report.low_c, -3);
        assert_eq!(report.wind_kph, 15);

        payload["wind"]["speed"] = json!(4.7); // 16.92 km/h
        assert_eq!(parse_utc(&payload).unwrap().wind_kph, 17);
    }

    #[test]
    fn times_use_the_given_timezone() {
        let ottawa_summer = FixedOffset::west_opt(4 * 3600).unwrap();
        let report = parse_at(&sample().to_string(), &ottawa_summer, retrieved()).unwrap();

        assert_eq!(report.sunrise_local, "00:26:40 -04:00");
        assert_eq!(report.sunset_local, "11:33:20 -04:00");
    }

    #[test]
    fn feels_like_is_optional() {
        let mut payload = sample();
        payload["main"].as_object_mut().unwrap().remove("feels_like");

        let report = parse_utc(&payload).unwrap();
        assert_eq!(report.feels_like_c, None);
    }

    #[test]
    fn missing_weather_array_fails() {
        let mut payload = sample();
        payload.as_object_mut().unwrap().remove("weather");

        let err = parse_utc(&payload).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)), "{err:?}");
    }

    #[test]
    fn empty_weather_array_fails() {
        let mut payload = sample();
        payload["weather"] = json!([]);

        let err = parse_utc(&payload).unwrap_err();
        assert!(matches!(err, ParseError::NoConditions), "{err:?}");
    }

    #[test]
    fn wrong_types_fail_the_whole_parse() {
        let mut payload = sample();
        payload["main"]["humidity"] = json!("fifty-five");
        assert!(parse_utc(&payload).is_err());

        let mut payload = sample();
        payload["main"]["feels_like"] = json!("warm");
        assert!(parse_utc(&payload).is_err());

        let mut payload = sample();
        payload["sys"] = json!({ "country": "CA", "sunrise": 1690000000 });
        assert!(parse_utc(&payload).is_err());
    }

    #[test]
    fn out_of_range_timestamp_fails() {
        let mut payload = sample();
        payload["sys"]["sunset"] = json!(i64::MAX);

        let err = parse_utc(&payload).unwrap_err();
        assert!(matches!(err, ParseError::Timestamp { field: "sunset", .. }), "{err:?}");
    }

    #[test]
    fn non_json_body_fails() {
        assert!(matches!(parse("<html>502</html>"), Err(ParseError::Json(_))));
    }
}
