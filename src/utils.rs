// Utility functions
use chrono::NaiveDate;

/// Clamps a raw score into [0, 100] and rounds it to the nearest integer.
/// Non-finite input collapses to 0.
pub fn clamp_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0).round()
}

/// Seed derived from a product id: the sum of its character codes.
pub fn product_seed(product_id: &str) -> u64 {
    product_id.chars().map(|c| c as u64).sum()
}

/// Parses a strict `YYYY-MM-DD` day.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_score_bounds_and_rounds() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(49.5), 50.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn seed_is_sum_of_char_codes() {
        assert_eq!(product_seed("ab"), 97 + 98);
        assert_eq!(product_seed(""), 0);
    }

    #[test]
    fn parse_day_is_strict() {
        assert!(parse_day("2025-01-31").is_some());
        assert!(parse_day("2025-1-31").is_none());
        assert!(parse_day("2025-02-30").is_none());
        assert!(parse_day("2025/01/31").is_none());
        assert!(parse_day("+025-01-31").is_none());
    }
}
