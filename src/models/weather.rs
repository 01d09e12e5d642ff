//! Derived weather samples and sunny ranges

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One daylight instant of the 15-minute series, scored and classified.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSample {
    /// Local timestamp of this sample
    pub datetime: NaiveDateTime,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// WMO weather code
    pub weather_code: u8,
    /// Direct radiation on the horizontal plane in W/m²
    pub direct_radiation: f64,
    /// Direct radiation on the plane normal to the sun in W/m²
    pub direct_normal_irradiance: f64,
    /// Human-readable description of `weather_code`
    pub weather_description: String,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    /// Sun percent (0-100)
    pub score: u8,
    pub is_sunny: bool,
}

/// A maximal run of consecutive sunny samples.
///
/// `start` and `end` share the analysed samples rather than copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct SunnyRange {
    pub length: usize,
    pub start: Arc<WeatherSample>,
    pub end: Arc<WeatherSample>,
}

/// Convert a WMO weather code to a short description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Sunny",
        1 => "Mainly Sunny",
        2 => "Partly Cloudy",
        3 => "Cloudy",
        45 => "Foggy",
        48 => "Rime Fog",
        51 => "Light Drizzle",
        53 => "Drizzle",
        55 => "Heavy Drizzle",
        56 => "Light Freezing Drizzle",
        57 => "Freezing Drizzle",
        61 => "Light Rain",
        63 => "Rain",
        65 => "Heavy Rain",
        66 => "Light Freezing Rain",
        67 => "Freezing Rain",
        71 => "Light Snow",
        73 => "Snow",
        75 => "Heavy Snow",
        77 => "Snow Grains",
        80 => "Light Showers",
        81 => "Showers",
        82 => "Heavy Showers",
        85 => "Light Snow Showers",
        86 => "Snow Showers",
        95 => "Thunderstorm",
        96 => "Light Thunderstorms With Hail",
        99 => "Thunderstorm With Hail",
        _ => "Unknown",
    }
}
