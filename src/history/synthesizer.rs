use crate::model::{PricePoint, PriceSeries};
use crate::utils::product_seed;
use chrono::{Duration, NaiveDate};

/// Days of history synthesized when nothing better is available.
pub const SYNTHETIC_DAYS: usize = 90;

/// Maximum daily deviation from the current price, as a fraction of it.
const VARIANCE: f64 = 0.02;
/// Extra price carried by the oldest point; fades linearly towards today.
const TREND: f64 = 0.04;
/// Synthesized prices never drop below this fraction of the current price.
const FLOOR_RATIO: f64 = 0.75;

/// Deterministic pseudo-random value in [0, 1) for a (seed, day) pair.
fn sine_hash(seed: u64, day_index: usize) -> f64 {
    let x = ((seed as f64) * 12.9898 + (day_index as f64) * 78.233).sin() * 43_758.545_3;
    x - x.floor()
}

/// Builds a plausible daily history of `days` points ending at `end_date`.
///
/// The same `product_id` and `current_price` always give the same prices, and
/// the last point is exactly `current_price`.
pub fn synthesize(product_id: &str, current_price: f64, days: usize, end_date: NaiveDate) -> PriceSeries {
    let days = days.max(1);
    let seed = product_seed(product_id);
    let floor = current_price * FLOOR_RATIO;

    let points = (0..days).map(|i| {
        let days_ago = days - 1 - i;
        let noise = (sine_hash(seed, i) - 0.5) * 2.0 * VARIANCE * current_price;
        let trend = current_price * TREND * (days_ago as f64 / days as f64);
        let price = ((current_price + trend + noise).max(floor) * 100.0).round() / 100.0;
        PricePoint::new(end_date - Duration::days(days_ago as i64), price)
    });

    let mut series = PriceSeries::from_points(points);
    series.pin_last_price(current_price);
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn last_point_is_current_price() {
        for price in [0.99, 19.95, 1234.567] {
            let series = synthesize("sku-42", price, SYNTHETIC_DAYS, today());
            let last = series.last().unwrap();
            assert_eq!(last.price, price);
            assert_eq!(last.date, today());
        }
    }

    #[test]
    fn same_product_same_series() {
        let a = synthesize("B0CHX1W1XY", 349.0, 60, today());
        let b = synthesize("B0CHX1W1XY", 349.0, 60, today());
        assert_eq!(a, b);
        let other = synthesize("B0CHX1W1XZ", 349.0, 60, today());
        assert_ne!(a.prices(), other.prices());
    }

    #[test]
    fn prices_stay_near_and_above_floor() {
        let series = synthesize("abc", 200.0, SYNTHETIC_DAYS, today());
        assert_eq!(series.len(), SYNTHETIC_DAYS);
        for p in series.points() {
            assert!(p.price >= 150.0, "{p:?}");
            assert!(p.price <= 200.0 * (1.0 + TREND + VARIANCE) + 0.01, "{p:?}");
        }
    }

    #[test]
    fn dates_are_consecutive_days() {
        let series = synthesize("abc", 10.0, 5, today());
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates.first(), Some(&(today() - Duration::days(4))));
        assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
    }

    #[test]
    fn zero_days_still_yields_today() {
        let series = synthesize("abc", 10.0, 0, today());
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().unwrap().price, 10.0);
    }
}
