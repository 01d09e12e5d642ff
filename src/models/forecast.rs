//! Forecast request key and the raw Open-Meteo payload schema

use super::Location;
use crate::time_utils::DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one provider request: a calendar date at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastKey {
    pub date: NaiveDate,
    pub location: Location,
}

impl ForecastKey {
    #[must_use]
    pub fn new(date: NaiveDate, location: Location) -> Self {
        Self { date, location }
    }

    /// ISO date string sent as `start_date` / `end_date`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for ForecastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weather:{}:{}", self.date_string(), self.location)
    }
}

/// Forecast document as returned by the provider.
///
/// Only the series the analysis needs are modelled; everything else in the
/// response (units, elevation, offsets) is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastPayload {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    pub minutely_15: Minutely15Series,
    pub daily: DailySeries,
}

/// 15-minute series. Every vector is index-aligned with `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minutely15Series {
    pub time: Vec<String>,
    pub is_day: Vec<Option<u8>>,
    #[serde(rename = "weathercode")]
    pub weather_code: Vec<Option<u8>>,
    #[serde(rename = "cloudcover")]
    pub cloud_cover: Vec<Option<u8>>,
    #[serde(rename = "direct_radiation_instant")]
    pub direct_radiation: Vec<Option<f64>>,
    #[serde(rename = "direct_normal_irradiance_instant")]
    pub direct_normal_irradiance: Vec<Option<f64>>,
}

impl Minutely15Series {
    /// Name and length of every series, for alignment checks.
    #[must_use]
    pub fn series_lengths(&self) -> [(&'static str, usize); 5] {
        [
            ("is_day", self.is_day.len()),
            ("weathercode", self.weather_code.len()),
            ("cloudcover", self.cloud_cover.len()),
            ("direct_radiation_instant", self.direct_radiation.len()),
            (
                "direct_normal_irradiance_instant",
                self.direct_normal_irradiance.len(),
            ),
        ]
    }
}

/// Daily series; one entry per requested date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_key_display() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 22).unwrap();
        let key = ForecastKey::new(date, Location::new(52.52, 13.28));
        assert_eq!(key.date_string(), "2023-11-22");
        assert_eq!(key.to_string(), "weather:2023-11-22:52.5200, 13.2800");
    }

    #[test]
    fn test_forecast_key_equality() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 22).unwrap();
        let key = ForecastKey::new(date, Location::new(52.52, 13.28));
        assert_eq!(key, ForecastKey::new(date, Location::new(52.52, 13.28)));
        assert_ne!(key, ForecastKey::new(date.succ_opt().unwrap(), key.location));
        assert_ne!(key, ForecastKey::new(date, Location::new(52.52, 13.29)));
    }

    #[test]
    fn test_payload_deserializes_provider_shape() {
        let payload: RawForecastPayload = serde_json::from_value(json!({
            "latitude": 52.52,
            "longitude": 13.28,
            "generationtime_ms": 0.2,
            "timezone": "Europe/Berlin",
            "minutely_15_units": { "time": "iso8601" },
            "minutely_15": {
                "time": ["2023-11-22T09:00", "2023-11-22T09:15"],
                "is_day": [1, 1],
                "weathercode": [3, null],
                "cloudcover": [90, 85],
                "direct_radiation_instant": [25.0, 87.5],
                "direct_normal_irradiance_instant": [100.0, 225.0]
            },
            "daily": {
                "time": ["2023-11-22"],
                "sunrise": ["2023-11-22T07:39"],
                "sunset": ["2023-11-22T16:02"]
            }
        }))
        .unwrap();

        assert_eq!(payload.minutely_15.time.len(), 2);
        assert_eq!(payload.minutely_15.weather_code, vec![Some(3), None]);
        assert_eq!(payload.daily.sunrise[0], "2023-11-22T07:39");
        assert_eq!(payload.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_payload_missing_series_is_rejected() {
        let result: Result<RawForecastPayload, _> = serde_json::from_value(json!({
            "minutely_15": { "time": [] },
            "daily": { "sunrise": [], "sunset": [] }
        }));
        assert!(result.is_err());
    }
}
