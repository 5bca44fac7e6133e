use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bunkmate_common::AppError;

const SECONDS_PER_DAY: i64 = 86_400;

// Nights are the ceiling of the stay span in days; a stay must cover at
// least part of one night.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<i64, AppError> {
    let span_seconds = (check_out - check_in).num_seconds();
    if span_seconds <= 0 {
        return Err(AppError::Validation(
            "Check-out must be after check-in".to_string(),
        ));
    }

    Ok((span_seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
}

// total = price * nights * guests * (1 - discount/100), rounded to cents.
pub fn booking_total(
    price_per_night: Decimal,
    nights: i64,
    guests: i32,
    discount_percent: Decimal,
) -> Decimal {
    let gross = price_per_night * Decimal::from(nights) * Decimal::from(guests);
    let factor = Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED;
    (gross * factor).round_dp(2)
}

pub fn validate_discount(discount_percent: Decimal) -> Result<(), AppError> {
    if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
        return Err(AppError::Validation(
            "Discount must be between 0 and 100 percent".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn whole_days_count_exactly() {
        let nights = nights_between(at(2024, 6, 1, 14), at(2024, 6, 3, 14)).unwrap();
        assert_eq!(nights, 2);
    }

    #[test]
    fn partial_days_round_up() {
        // 2 days and 4 hours -> 3 nights
        let nights = nights_between(at(2024, 6, 1, 14), at(2024, 6, 3, 18)).unwrap();
        assert_eq!(nights, 3);

        // A few hours still count as one night
        let nights = nights_between(at(2024, 6, 1, 20), at(2024, 6, 2, 2)).unwrap();
        assert_eq!(nights, 1);
    }

    #[test]
    fn non_positive_spans_are_rejected() {
        assert!(nights_between(at(2024, 6, 3, 12), at(2024, 6, 1, 12)).is_err());
        assert!(nights_between(at(2024, 6, 1, 12), at(2024, 6, 1, 12)).is_err());
    }

    #[test]
    fn total_multiplies_price_nights_and_guests() {
        let total = booking_total(Decimal::from(40), 3, 2, Decimal::ZERO);
        assert_eq!(total, Decimal::new(24000, 2)); // 240.00
    }

    #[test]
    fn discount_reduces_total_by_percent() {
        // 40 * 3 * 2 = 240, minus 25% = 180
        let total = booking_total(Decimal::from(40), 3, 2, Decimal::from(25));
        assert_eq!(total, Decimal::new(18000, 2));

        // 100% discount floors at zero
        let total = booking_total(Decimal::from(40), 3, 2, Decimal::ONE_HUNDRED);
        assert_eq!(total, Decimal::new(0, 2));
    }

    #[test]
    fn totals_round_to_cents() {
        // 19.99 * 3 * 1 with 10% off = 53.973 -> 53.97
        let total = booking_total(Decimal::new(1999, 2), 3, 1, Decimal::from(10));
        assert_eq!(total, Decimal::new(5397, 2));
    }

    #[test]
    fn discount_bounds_are_validated() {
        assert!(validate_discount(Decimal::from(-1)).is_err());
        assert!(validate_discount(Decimal::from(101)).is_err());
        assert!(validate_discount(Decimal::ZERO).is_ok());
        assert!(validate_discount(Decimal::ONE_HUNDRED).is_ok());
    }
}
