//! Small numeric helpers used by the sun scoring heuristic

/// Clamp `value` into `[min, max]`.
///
/// Returns `NaN` when the range is inverted or any input is `NaN`, so a bad
/// range never silently produces a plausible number.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || min.is_nan() || max.is_nan() || min > max {
        return f64::NAN;
    }
    value.max(min).min(max)
}

/// Clamp into the unit interval.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Build a linear normalizer mapping `low -> 0.0` and `high -> 1.0`.
///
/// The result is not clamped: values outside `[low, high]` map below 0 or above 1.
/// An empty or inverted range yields `NaN` for every input.
pub fn normalizer(low: f64, high: f64) -> impl Fn(f64) -> f64 {
    move |value| {
        if low >= high {
            return f64::NAN;
        }
        (value - low) / (high - low)
    }
}

/// Round to a fixed number of decimal places (half away from zero).
#[must_use]
pub fn round_to(decimals: u32, value: f64) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Inclusive range check that rejects non-finite inputs.
#[must_use]
pub fn is_between(min: f64, num: f64, max: f64) -> bool {
    if ![min, num, max].iter().all(|n| n.is_finite()) {
        return false;
    }
    min <= num && num <= max
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.5, 0.0, 1.0, 0.5)]
    #[case(-1.0, 0.0, 1.0, 0.0)]
    #[case(2.0, 0.0, 1.0, 1.0)]
    #[case(0.0, 0.0, 1.0, 0.0)]
    #[case(1.0, 0.0, 1.0, 1.0)]
    #[case(5.0, 3.0, 7.0, 5.0)]
    #[case(2.0, 3.0, 7.0, 3.0)]
    #[case(8.0, 3.0, 7.0, 7.0)]
    fn test_clamp(#[case] value: f64, #[case] min: f64, #[case] max: f64, #[case] expected: f64) {
        assert_eq!(clamp(value, min, max), expected);
    }

    #[test]
    fn test_clamp_invalid_range_is_nan() {
        assert!(clamp(0.5, 1.0, 0.0).is_nan());
        assert!(clamp(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[rstest]
    #[case(0.0, 10.0, 5.0, 0.5)]
    #[case(0.0, 10.0, 0.0, 0.0)]
    #[case(0.0, 10.0, 10.0, 1.0)]
    #[case(0.0, 10.0, -5.0, -0.5)]
    #[case(0.0, 10.0, 15.0, 1.5)]
    #[case(25.0, 150.0, 87.5, 0.5)]
    fn test_normalizer(#[case] low: f64, #[case] high: f64, #[case] value: f64, #[case] expected: f64) {
        let normalize = normalizer(low, high);
        assert!((normalize(value) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(10.0, 0.0)]
    #[case(5.0, 5.0)]
    fn test_normalizer_degenerate_range(#[case] low: f64, #[case] high: f64) {
        assert!(normalizer(low, high)(5.0).is_nan());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2, 0.736_4), 0.74);
        assert_eq!(round_to(2, 0.601_8), 0.6);
        assert_eq!(round_to(0, 2.5), 3.0);
    }

    #[rstest]
    #[case(1.0, 0.0, 2.0, true)]
    #[case(2.0, 0.0, 1.0, false)]
    #[case(0.0, 1.0, 2.0, false)]
    #[case(-2.0, -3.0, -1.0, true)]
    #[case(-1.0, -1.0, -1.0, true)]
    #[case(-1.0, -2.0, -2.0, false)]
    #[case(f64::NAN, 0.0, 1.0, false)]
    fn test_is_between(#[case] num: f64, #[case] min: f64, #[case] max: f64, #[case] expected: bool) {
        assert_eq!(is_between(min, num, max), expected);
    }
}
