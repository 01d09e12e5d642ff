//! Configuration management for the sunny notifier
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before the pipeline is built.

use crate::SunnyError;
use crate::models::Location;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SunnyConfig {
    /// Forecast provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Forecast cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Location used when none is given on the command line
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Forecast provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Forecast endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// IANA timezone the provider reports local times in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Retries after the first failed attempt
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Forecast cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched forecast stays fresh
    #[serde(default = "default_stale_time_seconds")]
    pub stale_time_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1/dwd-icon".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_stale_time_seconds() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timezone: default_timezone(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_seconds: default_stale_time_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SunnyConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    ///
    /// Environment variables use the `SUNNY_` prefix and `__` between
    /// section and key, e.g. `SUNNY_WEATHER__BASE_URL`.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SUNNY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: SunnyConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sunny-notify").join("config.toml"))
    }

    /// Replace blank string settings with their defaults
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.trim().is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timezone.trim().is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_defaults()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(SunnyError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.weather.max_retries > 10 {
            return Err(SunnyError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.weather.retry_delay_ms > 60_000 {
            return Err(SunnyError::config("Retry delay cannot exceed 60000 ms").into());
        }

        if self.cache.stale_time_seconds == 0 || self.cache.stale_time_seconds > 86_400 {
            return Err(SunnyError::config(
                "Cache stale time must be between 1 and 86400 seconds",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SunnyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SunnyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(
                SunnyError::config("Weather API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        self.timezone()?;

        Ok(())
    }

    fn validate_defaults(&self) -> Result<()> {
        match (self.defaults.latitude, self.defaults.longitude) {
            (None, None) => Ok(()),
            (Some(latitude), Some(longitude)) => {
                if Location::new(latitude, longitude).is_valid() {
                    Ok(())
                } else {
                    Err(SunnyError::config(format!(
                        "Default location {latitude}, {longitude} is not a valid coordinate"
                    ))
                    .into())
                }
            }
            _ => Err(SunnyError::config(
                "Default location needs both latitude and longitude",
            )
            .into()),
        }
    }

    /// Timezone of the forecast's local timestamps
    pub fn timezone(&self) -> Result<Tz> {
        self.weather.timezone.parse::<Tz>().map_err(|_| {
            SunnyError::config(format!("Unknown timezone '{}'", self.weather.timezone)).into()
        })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.weather.timeout_seconds))
    }

    #[must_use]
    pub fn default_location(&self) -> Option<Location> {
        match (self.defaults.latitude, self.defaults.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = SunnyConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1/dwd-icon");
        assert_eq!(config.weather.timezone, "Europe/Berlin");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.weather.max_retries, 3);
        assert_eq!(config.cache.stale_time_seconds, 300);
        assert_eq!(config.logging.level, "info");
        assert!(config.default_location().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timezone_parsing() {
        let mut config = SunnyConfig::default();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Berlin);

        config.weather.timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown timezone"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SunnyConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SunnyConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout must be between"));

        let mut config = SunnyConfig::default();
        config.cache.stale_time_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = SunnyConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_location_needs_both_coordinates() {
        let mut config = SunnyConfig::default();
        config.defaults.latitude = Some(52.52);
        assert!(config.validate().is_err());
        assert!(config.default_location().is_none());

        config.defaults.longitude = Some(13.28);
        assert!(config.validate().is_ok());
        assert_eq!(config.default_location(), Some(Location::new(52.52, 13.28)));

        config.defaults.latitude = Some(123.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let file = write_config(
            r#"
            [weather]
            base_url = "http://localhost:8080/v1/dwd-icon"
            max_retries = 1

            [cache]
            stale_time_seconds = 60

            [defaults]
            latitude = 48.137
            longitude = 11.575
            "#,
        );

        let config = SunnyConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.base_url, "http://localhost:8080/v1/dwd-icon");
        assert_eq!(config.weather.max_retries, 1);
        assert_eq!(config.weather.timezone, "Europe/Berlin");
        assert_eq!(config.cache.stale_time_seconds, 60);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.default_location(), Some(Location::new(48.137, 11.575)));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let file = write_config(
            r#"
            [logging]
            format = "xml"
            "#,
        );

        let result = SunnyConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SunnyConfig::load_from_path(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.cache.stale_time_seconds, 300);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SunnyConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("sunny-notify"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
