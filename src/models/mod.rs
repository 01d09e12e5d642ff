//! Data models for the sunny notification pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and coordinate parsing
//! - Forecast: Request keys and the raw provider payload
//! - Weather: Scored samples and sunny ranges derived from a payload

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailySeries, ForecastKey, Minutely15Series, RawForecastPayload};
pub use location::{Location, parse_location_string};
pub use weather::{SunnyRange, WeatherSample, weather_code_to_description};
