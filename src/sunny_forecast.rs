//! Sunny Notification Messages
//!
//! Combines the forecast cache, the range analysis and the explainer into the
//! three messages users receive: an on-demand forecast for a day, the morning
//! summary and the hourly heads-up.

use crate::cache::{CachePolicy, ForecastCache};
use crate::config::SunnyConfig;
use crate::explain::{explain_ranges, explain_weather_range};
use crate::models::{Location, SunnyRange};
use crate::sunny_analysis::get_sunny_ranges;
use crate::time_utils::{Clock, SystemClock, local_now, resolve_date, within_the_hour};
use crate::weather::OpenMeteoClient;
use crate::{Result, SunnyError};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};

const NO_SUN: &str = "The sun is not expected to make a meaningful appearance";

/// Join message parts with newlines
pub fn lines<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject locations the forecast model does not cover
pub fn ensure_supported_location(location: &Location) -> Result<()> {
    if !location.is_valid() {
        return Err(SunnyError::validation(format!(
            "'{location}' is not a valid coordinate."
        )));
    }
    if !location.is_in_germany() {
        return Err(SunnyError::validation("Please choose location in Germany."));
    }
    Ok(())
}

/// Service producing sunny notification messages
pub struct SunnyForecastService {
    cache: Arc<ForecastCache>,
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl SunnyForecastService {
    pub fn new(cache: Arc<ForecastCache>, timezone: Tz, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            timezone,
            clock,
        }
    }

    /// Wire the Open-Meteo client, the wall clock and the configured cache policy
    pub fn from_config(config: &SunnyConfig) -> Result<Self> {
        let timezone = config
            .timezone()
            .map_err(|e| SunnyError::config(e.to_string()))?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let source = Arc::new(OpenMeteoClient::from_config(config)?);
        let cache = ForecastCache::new(source, Arc::clone(&clock), CachePolicy::from_config(config));

        Ok(Self::new(Arc::new(cache), timezone, clock))
    }

    /// Today's date in the provider timezone
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        local_now(self.clock.as_ref(), self.timezone).date()
    }

    /// Fetch the forecast for `date` and extract its sunny ranges
    pub async fn sunny_ranges(&self, date: NaiveDate, location: Location) -> Result<Vec<SunnyRange>> {
        let payload = self.cache.get_weather(date, location).await?;
        get_sunny_ranges(&payload)
    }

    /// Forecast for a relative day given as text, `None` meaning today
    pub async fn forecast_message(&self, day: Option<&str>, location: Location) -> Result<String> {
        let today = self.today();
        let Some(date) = resolve_date(day, today) else {
            debug!("Rejecting day offset {:?}", day);
            return Ok(lines([
                format!(
                    "I can't understand which date you want forecast when you say '{}'.",
                    day.unwrap_or_default()
                ),
                "Acceptable values are numbers for desired date between yesterday (-1) to 3 days from now"
                    .to_string(),
            ]));
        };

        let ranges = self.sunny_ranges(date, location).await?;
        info!("Found {} sunny ranges for {}", ranges.len(), date);

        if let Some(first) = ranges.first() {
            let header = format!("{} - Expect sunny times at:", first.start.date);
            return Ok(lines([header, explain_ranges(&ranges)]));
        }

        if date == today {
            Ok(format!("{NO_SUN} today."))
        } else {
            Ok(format!("{NO_SUN} on {}.", date.format(crate::time_utils::DATE_FORMAT)))
        }
    }

    /// Morning summary for today
    pub async fn morning_message(&self, location: Location) -> Result<String> {
        let ranges = self.sunny_ranges(self.today(), location).await?;

        let message = if ranges.is_empty() {
            "the sun is not expected to make a meaningful appearance today.".to_string()
        } else {
            lines(["expect sunny times at:".to_string(), explain_ranges(&ranges)])
        };

        Ok(format!("Good morning, {message}"))
    }

    /// Heads-up for a sunny range starting in the next clock hour, if any
    pub async fn hourly_message(&self, location: Location) -> Result<Option<String>> {
        let now = local_now(self.clock.as_ref(), self.timezone);
        let ranges = self.sunny_ranges(now.date(), location).await?;

        Ok(ranges
            .iter()
            .find(|range| within_the_hour(range.start.datetime, now))
            .map(|range| {
                format!(
                    "Expecting sunshine within the hour: {}",
                    explain_weather_range(range)
                )
            }))
    }
}
