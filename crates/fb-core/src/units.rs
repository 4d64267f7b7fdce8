//! Unit conversion and guarded arithmetic.
//!
//! Every chart that shows hours derives them through [`minutes_to_hours`], so
//! the same minute total always renders as the same number.

/// Round to one decimal place using `round(x * 10) / 10`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Minutes to hours, rounded to one decimal place.
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: u64) -> f64 {
    round_one_decimal(minutes as f64 / 60.0)
}

/// `numerator / denominator * 100`, or 0 when the denominator is zero.
#[allow(clippy::cast_precision_loss)]
pub fn ratio_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// `total / count`, or 0 when count is zero.
#[allow(clippy::cast_precision_loss)]
pub fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total as f64 / count as f64
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "rounded values are compared exactly on purpose"
)]
mod tests {
    use super::*;

    #[test]
    fn hours_round_to_one_decimal() {
        assert_eq!(minutes_to_hours(0), 0.0);
        assert_eq!(minutes_to_hours(25), 0.4);
        assert_eq!(minutes_to_hours(60), 1.0);
        assert_eq!(minutes_to_hours(90), 1.5);
        assert_eq!(minutes_to_hours(100), 1.7);
    }

    #[test]
    fn half_tenths_round_away_from_zero() {
        assert_eq!(round_one_decimal(0.25), 0.3);
        assert_eq!(round_one_decimal(1.04), 1.0);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio_percent(5, 0), 0.0);
        assert_eq!(ratio_percent(0, 0), 0.0);
        assert_eq!(ratio_percent(50, 100), 50.0);
        assert_eq!(ratio_percent(150, 100), 150.0);
    }

    #[test]
    fn average_guards_zero_count() {
        assert_eq!(average(100, 0), 0.0);
        assert_eq!(average(100, 4), 25.0);
    }
}
