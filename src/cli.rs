//! Command-line interface parsing for the `sunny` binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SunnyConfig;
use crate::models::{Location, parse_location_string};
use crate::sunny_forecast::ensure_supported_location;
use crate::{Result, SunnyError};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid location: '{0}'. Expected \"latitude,longitude\", e.g. \"52.52,13.41\"")]
    InvalidLocation(String),
}

/// Sunny notifier - when will the sun come out today?
#[derive(Parser, Debug)]
#[command(name = "sunny")]
#[command(about = "Sunny time forecasts from 15-minute irradiance data")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Location as "latitude,longitude"; falls back to the config defaults
    #[arg(long, value_name = "LAT,LON", value_parser = parse_location_arg, global = true)]
    pub location: Option<Location>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sunny times for a day
    ///
    /// DAY is an offset from today between -1 (yesterday) and 3; omitted means today.
    Forecast {
        #[arg(allow_hyphen_values = true)]
        day: Option<String>,
    },
    /// Morning summary of today's sunny times
    Morning,
    /// Announce a sunny range starting within the next hour
    Hourly,
}

/// Parses a `--location` argument
pub fn parse_location_arg(value: &str) -> std::result::Result<Location, CliError> {
    parse_location_string(value).ok_or_else(|| CliError::InvalidLocation(value.to_string()))
}

impl Cli {
    /// Location from the command line, else from the config defaults
    pub fn resolve_location(&self, config: &SunnyConfig) -> Result<Location> {
        let location = self
            .location
            .or_else(|| config.default_location())
            .ok_or_else(|| {
                SunnyError::validation(
                    "No location given. Pass --location \"lat,lon\" or set [defaults] in the config file.",
                )
            })?;
        ensure_supported_location(&location)?;
        Ok(location)
    }
}
