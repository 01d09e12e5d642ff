//! Open-Meteo forecast client
//!
//! Requests one day of 15-minute irradiance and cloud data plus that day's
//! sunrise and sunset for a single location.

use crate::cache::ForecastSource;
use crate::config::SunnyConfig;
use crate::error::SourceError;
use crate::models::{ForecastKey, RawForecastPayload};
use crate::{Result, SunnyError, VERSION};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DAILY_FIELDS: &str = "sunrise,sunset";
const MINUTELY_15_FIELDS: &str = "is_day,weathercode,cloudcover,direct_radiation_instant,direct_normal_irradiance_instant";

/// HTTP client for the Open-Meteo forecast endpoint
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        timezone: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("sunny-notify/{VERSION}"))
            .build()
            .map_err(|e| SunnyError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timezone: timezone.into(),
        })
    }

    pub fn from_config(config: &SunnyConfig) -> Result<Self> {
        Self::new(
            config.weather.base_url.clone(),
            config.weather.timezone.clone(),
            config.request_timeout(),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for one key; start and end date are the same day.
    #[must_use]
    pub fn request_url(&self, key: &ForecastKey) -> String {
        let date = key.date_string();
        format!(
            "{}?latitude={}&longitude={}&daily={}&minutely_15={}&timezone={}&start_date={}&end_date={}",
            self.base_url.trim_end_matches('/'),
            key.location.latitude,
            key.location.longitude,
            DAILY_FIELDS,
            MINUTELY_15_FIELDS,
            urlencoding::encode(&self.timezone),
            date,
            date
        )
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    #[tracing::instrument(name = "open_meteo_fetch", skip_all, fields(key = %key))]
    async fn fetch(&self, key: &ForecastKey) -> std::result::Result<RawForecastPayload, SourceError> {
        let url = self.request_url(key);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("OpenMeteo API returned HTTP {}", status);
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: RawForecastPayload = serde_json::from_str(&body)?;

        info!(
            "Retrieved {} forecast samples in {:.3}s",
            payload.minutely_15.time.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(payload)
    }
}
