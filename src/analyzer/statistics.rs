/// Descriptive statistics shared by the price models.
pub struct SeriesStats;

impl SeriesStats {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(data: &[f64]) -> Option<f64> {
        if data.is_empty() {
            return None;
        }
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator). 0 with fewer than two values.
    pub fn sample_std_dev(data: &[f64]) -> f64 {
        if data.len() < 2 {
            return 0.0;
        }
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
        variance.sqrt()
    }

    /// Day-over-day relative changes. Steps starting from a zero price are skipped.
    pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
        prices
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }

    /// The trailing `size` values ending at `end` (inclusive), if that many exist.
    pub fn trailing_window(data: &[f64], end: usize, size: usize) -> Option<&[f64]> {
        if size == 0 || end >= data.len() || end + 1 < size {
            return None;
        }
        Some(&data[end + 1 - size..=end])
    }

    /// Simple moving average aligned to each index; `None` until the window fills.
    pub fn moving_average(data: &[f64], window_size: usize) -> Vec<Option<f64>> {
        (0..data.len())
            .map(|i| Self::trailing_window(data, i, window_size).and_then(Self::mean))
            .collect()
    }
}
