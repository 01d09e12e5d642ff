//! Sunny Range Analysis
//!
//! Turns a raw 15-minute forecast into scored daylight samples and segments
//! them into contiguous sunny ranges. Everything here is pure: the same payload
//! always yields the same ranges.

use crate::models::{
    RawForecastPayload, SunnyRange, WeatherSample, weather_code_to_description,
};
use crate::numeric::{clamp_unit, normalizer, round_to};
use crate::time_utils::{format_date, format_time, hours_distance, parse_datetime};
use crate::{Result, SunnyError};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::debug;

/// Minimum score (0-100) for a sample to count as sunny.
pub const SUNNY_THRESHOLD: u8 = 60;

/// Stored for a daylight sample without a weather code; describes as "Unknown"
const UNKNOWN_WEATHER_CODE: u8 = u8::MAX;

/// Runs shorter than this are treated as noise.
pub const MIN_RANGE_LENGTH: usize = 2;

const DIRECT_RADIATION_RANGE: (f64, f64) = (25.0, 150.0);
const DIRECT_NORMAL_IRRADIANCE_RANGE: (f64, f64) = (50.0, 400.0);
const LOW_CLOUD_COVER: u8 = 20;
const SUN_EVENT_WINDOW_HOURS: f64 = 2.0;
const BOOST: f64 = 0.1;

/// Inputs of the sun score for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunConditions {
    pub datetime: NaiveDateTime,
    pub cloud_cover: u8,
    pub direct_radiation: f64,
    pub direct_normal_irradiance: f64,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

/// Multiplicative boost for low cloud cover and for the hours around sunrise and sunset.
#[must_use]
pub fn sun_factor(conditions: &SunConditions) -> f64 {
    let mut factor = 1.0;
    if conditions.cloud_cover <= LOW_CLOUD_COVER {
        factor += BOOST;
    }
    if hours_distance(conditions.datetime, conditions.sunrise) <= SUN_EVENT_WINDOW_HOURS {
        factor += BOOST;
    }
    if hours_distance(conditions.datetime, conditions.sunset) <= SUN_EVENT_WINDOW_HOURS {
        factor += BOOST;
    }
    factor
}

/// Heuristic sunniness of one instant, 0-100.
///
/// Both irradiance signals are normalized without clamping, multiplied, boosted
/// and only then clamped to the unit interval and rounded to whole percent.
#[must_use]
pub fn sun_percent(conditions: &SunConditions) -> u8 {
    let normalized_dni = normalizer(DIRECT_RADIATION_RANGE.0, DIRECT_RADIATION_RANGE.1)(
        conditions.direct_radiation,
    );
    let normalized_din = normalizer(
        DIRECT_NORMAL_IRRADIANCE_RANGE.0,
        DIRECT_NORMAL_IRRADIANCE_RANGE.1,
    )(conditions.direct_normal_irradiance);

    let score = clamp_unit(normalized_dni * normalized_din * sun_factor(conditions));
    if score.is_nan() {
        return 0;
    }
    // clamped to [0, 1], so the cast cannot truncate
    (round_to(2, score) * 100.0).round() as u8
}

#[must_use]
pub fn is_sunny(score: u8) -> bool {
    score >= SUNNY_THRESHOLD
}

fn parse_timestamp(value: &str, field: &str) -> Result<NaiveDateTime> {
    parse_datetime(value)
        .ok_or_else(|| SunnyError::malformed(format!("invalid timestamp '{value}' in {field}")))
}

fn first_daily(values: &[String], field: &str) -> Result<NaiveDateTime> {
    let value = values
        .first()
        .ok_or_else(|| SunnyError::malformed(format!("daily.{field} is empty")))?;
    parse_timestamp(value, &format!("daily.{field}"))
}

/// Build scored daylight samples from the payload, in provider order.
///
/// Fails on misaligned series, a missing sunrise/sunset or an unparsable
/// timestamp. Daylight samples with missing measurements are kept with a
/// score of 0, so they end any sunny run they fall into.
pub fn build_samples(payload: &RawForecastPayload) -> Result<Vec<WeatherSample>> {
    let series = &payload.minutely_15;
    let expected = series.time.len();
    for (name, len) in series.series_lengths() {
        if len != expected {
            return Err(SunnyError::malformed(format!(
                "minutely_15.{name} has {len} values, expected {expected}"
            )));
        }
    }

    let sunrise = first_daily(&payload.daily.sunrise, "sunrise")?;
    let sunset = first_daily(&payload.daily.sunset, "sunset")?;

    let mut samples = Vec::with_capacity(expected);
    let mut incomplete = 0_usize;

    for (i, raw_time) in series.time.iter().enumerate() {
        if series.is_day[i] != Some(1) {
            continue;
        }
        let datetime = parse_timestamp(raw_time, "minutely_15.time")?;

        let weather_code = series.weather_code[i];
        let cloud_cover = series.cloud_cover[i];
        let direct_radiation = series.direct_radiation[i];
        let direct_normal_irradiance = series.direct_normal_irradiance[i];

        let score = match (cloud_cover, direct_radiation, direct_normal_irradiance) {
            (Some(cloud_cover), Some(direct_radiation), Some(direct_normal_irradiance))
                if weather_code.is_some() =>
            {
                sun_percent(&SunConditions {
                    datetime,
                    cloud_cover,
                    direct_radiation,
                    direct_normal_irradiance,
                    sunrise,
                    sunset,
                })
            }
            _ => {
                debug!("Daylight sample {} has missing values, treating as not sunny", raw_time);
                incomplete += 1;
                0
            }
        };
        let weather_code = weather_code.unwrap_or(UNKNOWN_WEATHER_CODE);
        let cloud_cover = cloud_cover.unwrap_or(100);
        let direct_radiation = direct_radiation.unwrap_or(0.0);
        let direct_normal_irradiance = direct_normal_irradiance.unwrap_or(0.0);

        samples.push(WeatherSample {
            datetime,
            date: format_date(&datetime),
            time: format_time(&datetime),
            cloud_cover,
            weather_code,
            direct_radiation,
            direct_normal_irradiance,
            weather_description: weather_code_to_description(weather_code).to_string(),
            sunrise,
            sunset,
            score,
            is_sunny: is_sunny(score),
        });
    }

    if incomplete > 0 {
        debug!("{} daylight samples had missing values", incomplete);
    }

    Ok(samples)
}

/// Split classified samples into maximal sunny runs.
///
/// A run is closed by the first non-sunny sample after it; a run still open at
/// the end of the sequence is closed by the end itself. No length filter here.
#[must_use]
pub fn segment_sunny_runs(samples: &[Arc<WeatherSample>]) -> Vec<SunnyRange> {
    let mut ranges = Vec::new();
    let mut run_start: Option<usize> = None;

    for (index, sample) in samples.iter().enumerate() {
        match (sample.is_sunny, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                ranges.push(SunnyRange {
                    length: index - start,
                    start: Arc::clone(&samples[start]),
                    end: Arc::clone(&samples[index - 1]),
                });
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        let last = samples.len() - 1;
        ranges.push(SunnyRange {
            length: samples.len() - start,
            start: Arc::clone(&samples[start]),
            end: Arc::clone(&samples[last]),
        });
    }

    ranges
}

/// Chronological sunny ranges of at least [`MIN_RANGE_LENGTH`] samples.
pub fn get_sunny_ranges(payload: &RawForecastPayload) -> Result<Vec<SunnyRange>> {
    let samples: Vec<Arc<WeatherSample>> = build_samples(payload)?
        .into_iter()
        .map(Arc::new)
        .collect();

    let ranges: Vec<SunnyRange> = segment_sunny_runs(&samples)
        .into_iter()
        .filter(|range| range.length >= MIN_RANGE_LENGTH)
        .collect();

    debug!(
        "Found {} sunny ranges in {} daylight samples",
        ranges.len(),
        samples.len()
    );

    Ok(ranges)
}
