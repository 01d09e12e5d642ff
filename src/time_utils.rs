//! Date and time helpers
//!
//! The provider returns local wall-clock timestamps (no offset) in the configured
//! timezone, so everything here works on `NaiveDateTime`. The current instant is
//! always passed in or read from a [`Clock`], never taken implicitly.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Earliest and latest accepted relative day offsets for [`resolve_date`].
pub const MIN_DAY_OFFSET: i64 = -1;
pub const MAX_DAY_OFFSET: i64 = 3;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: parking_lot::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: parking_lot::Mutex::new(now),
        }
    }

    pub(crate) fn at(rfc3339: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Current wall-clock time in the provider timezone.
#[must_use]
pub fn local_now(clock: &dyn Clock, timezone: Tz) -> NaiveDateTime {
    clock.now().with_timezone(&timezone).naive_local()
}

#[must_use]
pub fn format_date(datetime: &NaiveDateTime) -> String {
    datetime.format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn format_time(datetime: &NaiveDateTime) -> String {
    datetime.format(TIME_FORMAT).to_string()
}

/// Parse a provider timestamp (`2023-11-22T09:45`, seconds optional).
#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn start_of_hour(datetime: NaiveDateTime) -> NaiveDateTime {
    datetime
        .with_minute(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(datetime)
}

/// True when `datetime` lies in the clock hour following the one containing `now`.
///
/// Compared at hour granularity: anything in the current hour (including `now`
/// itself) is excluded, the last instant of the next hour is included.
#[must_use]
pub fn within_the_hour(datetime: NaiveDateTime, now: NaiveDateTime) -> bool {
    let next_hour = start_of_hour(now) + Duration::hours(1);
    let after_next_hour = next_hour + Duration::hours(1);
    datetime >= next_hour && datetime < after_next_hour
}

/// Inclusive daylight check at hour granularity.
#[must_use]
pub fn is_daytime(sunrise: NaiveDateTime, sunset: NaiveDateTime, datetime: NaiveDateTime) -> bool {
    let hour = start_of_hour(datetime);
    start_of_hour(sunrise) <= hour && hour <= start_of_hour(sunset)
}

/// Compares hour-of-day only; the dates may differ.
#[must_use]
pub fn is_same_hour(datetime: NaiveDateTime, compared: NaiveDateTime) -> bool {
    datetime.hour() == compared.hour()
}

/// Absolute distance between two instants in fractional hours.
#[must_use]
pub fn hours_distance(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    let seconds = (a - b).num_seconds().unsigned_abs();
    seconds as f64 / 3600.0
}

/// Strict `YYYY-MM-DD` check.
#[must_use]
pub fn date_is_valid(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// Resolve a relative day offset into an absolute date.
///
/// `None` and blank input mean "today". Any other input must be a finite number
/// in `[MIN_DAY_OFFSET, MAX_DAY_OFFSET]`; otherwise `None` is returned. Fractional
/// offsets round to the nearest day, halves upwards, so `"1.5"` is two days ahead.
#[must_use]
pub fn resolve_date(value: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    let offset = match value.map(str::trim) {
        None | Some("") => 0.0,
        Some(text) => text.parse::<f64>().ok().filter(|offset| offset.is_finite())?,
    };
    if !(MIN_DAY_OFFSET as f64..=MAX_DAY_OFFSET as f64).contains(&offset) {
        return None;
    }
    let days = (offset + 0.5).floor() as i64;
    today.checked_add_signed(Duration::days(days))
}
