use crate::errors::{BookingError, BookingResult};
use crate::models::time_range::TimeRange;

/// Total price of `range` at `price_per_hour`, rounded to two decimal places.
///
/// # Errors
///
/// * `BookingError::InvalidRate` - the rate is zero, negative or not finite
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use kickoff_core::{TimeRange, compute_price};
///
/// let range = TimeRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(compute_price(500.0, &range).unwrap(), 750.0);
/// ```
pub fn compute_price(price_per_hour: f64, range: &TimeRange) -> BookingResult<f64> {
    if !price_per_hour.is_finite() || price_per_hour <= 0.0 {
        return Err(BookingError::InvalidRate(price_per_hour));
    }

    Ok(round_to_cents(price_per_hour * range.duration_hours()))
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
