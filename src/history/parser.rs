// Parsing of language-model price approximations
use crate::model::{PricePoint, PriceSeries};
use crate::utils::parse_day;
use std::collections::HashSet;

/// Minimum number of valid lines for an approximation to be accepted.
pub const MIN_APPROXIMATED_POINTS: usize = 7;

pub trait HistoryParser {
    /// Turns raw collaborator text into a series ending at `current_price`,
    /// or `None` when the text does not carry enough usable points.
    fn parse(&self, text: &str, current_price: f64) -> Option<PriceSeries>;
}

/// Accepts only lines of the exact form `YYYY-MM-DD,price`.
pub struct PriceLineParser;

impl PriceLineParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_line(line: &str) -> Option<PricePoint> {
        let (date, price) = line.trim().split_once(',')?;
        let date = parse_day(date)?;
        if !is_plain_decimal(price) {
            return None;
        }
        let price: f64 = price.parse().ok()?;
        Some(PricePoint::new(date, price))
    }
}

impl Default for PriceLineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Digits with at most one inner decimal point, nothing else.
fn is_plain_decimal(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.is_none_or(all_digits)
}

impl HistoryParser for PriceLineParser {
    fn parse(&self, text: &str, current_price: f64) -> Option<PriceSeries> {
        let mut seen = HashSet::new();
        let points: Vec<PricePoint> = text
            .lines()
            .filter_map(Self::parse_line)
            .filter(|p| p.price > 0.0)
            .filter(|p| seen.insert(p.date))
            .collect();

        if points.len() < MIN_APPROXIMATED_POINTS {
            return None;
        }

        let mut series = PriceSeries::from_points(points);
        series.pin_last_price(current_price);
        Some(series)
    }
}
