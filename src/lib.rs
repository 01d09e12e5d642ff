//! `sunny-notify` - Sunny time notifications from 15-minute irradiance forecasts
//!
//! This library fetches Open-Meteo forecasts through a single-flight TTL cache,
//! scores every daylight sample for sunniness and turns runs of sunny samples
//! into short human-readable notifications.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod explain;
pub mod logging;
pub mod models;
pub mod numeric;
pub mod sunny_analysis;
pub mod sunny_forecast;
pub mod time_utils;
pub mod weather;

// Re-export core types for public API
pub use cache::{CachePolicy, ForecastCache, ForecastSource};
pub use config::SunnyConfig;
pub use error::{FetchFailure, SourceError, SunnyError};
pub use explain::{explain_weather_range, explain_weather_range_with_description};
pub use models::{ForecastKey, Location, RawForecastPayload, SunnyRange, WeatherSample};
pub use sunny_analysis::{SUNNY_THRESHOLD, get_sunny_ranges};
pub use sunny_forecast::SunnyForecastService;
pub use time_utils::{Clock, SystemClock};
pub use weather::OpenMeteoClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SunnyError>;
