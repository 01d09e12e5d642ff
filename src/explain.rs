//! Human-readable rendering of sunny ranges

use crate::models::SunnyRange;

/// `"HH:MM -> HH:MM"` from the first to the last sunny sample of the range.
#[must_use]
pub fn explain_weather_range(range: &SunnyRange) -> String {
    format!("{} -> {}", range.start.time, range.end.time)
}

/// Like [`explain_weather_range`], followed by the conditions at the start.
#[must_use]
pub fn explain_weather_range_with_description(range: &SunnyRange) -> String {
    format!(
        "{} ({})",
        explain_weather_range(range),
        range.start.weather_description
    )
}

/// One explanation per range, newline separated.
#[must_use]
pub fn explain_ranges(ranges: &[SunnyRange]) -> String {
    ranges
        .iter()
        .map(explain_weather_range)
        .collect::<Vec<_>>()
        .join("\n")
}
