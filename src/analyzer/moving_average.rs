use crate::analyzer::statistics::SeriesStats;
use crate::model::{MovingAveragePoint, MovingAverageResult, PriceSeries};
use crate::utils::clamp_score;

pub const SHORT_WINDOW: usize = 7;
pub const LONG_WINDOW: usize = 60;

/// Shortest series the trend model accepts.
pub const MIN_POINTS: usize = SHORT_WINDOW;

const NEUTRAL_SCORE: f64 = 50.0;

/// Trailing-window statistics at the latest index of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowStats {
    average: f64,
    std_dev: f64,
    z_score: f64,
}

impl WindowStats {
    fn at_latest(prices: &[f64], window: usize, current_price: f64) -> Option<Self> {
        let last = prices.len().checked_sub(1)?;
        let slice = SeriesStats::trailing_window(prices, last, window)?;
        let average = SeriesStats::mean(slice)?;
        let std_dev = SeriesStats::sample_std_dev(slice);
        Some(Self {
            average,
            std_dev,
            z_score: z_score(current_price, average, std_dev),
        })
    }

    fn buy_score(&self) -> f64 {
        window_score(self.z_score)
    }
}

/// Signed distance from the average in standard deviations; 0 for a flat window.
pub fn z_score(price: f64, average: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    (price - average) / std_dev
}

/// Buy score for one window: 50 at the average, 100 two deviations below, 0 two above.
pub fn window_score(z: f64) -> f64 {
    clamp_score(50.0 - 25.0 * z)
}

/// Compares the latest price against its 7- and 60-day moving averages.
///
/// Returns `None` when the series is shorter than [`MIN_POINTS`]. A window
/// that cannot be filled contributes a neutral 50 to the final average.
pub fn moving_average(series: &PriceSeries) -> Option<MovingAverageResult> {
    if series.len() < MIN_POINTS {
        return None;
    }
    let prices = series.prices();
    let current_price = *prices.last()?;

    let short = WindowStats::at_latest(&prices, SHORT_WINDOW, current_price);
    let long = WindowStats::at_latest(&prices, LONG_WINDOW, current_price);

    let short_score = short.map(|w| w.buy_score()).unwrap_or(NEUTRAL_SCORE);
    let long_score = long.map(|w| w.buy_score()).unwrap_or(NEUTRAL_SCORE);

    let ma7_series = SeriesStats::moving_average(&prices, SHORT_WINDOW);
    let ma60_series = SeriesStats::moving_average(&prices, LONG_WINDOW);
    let per_point = series
        .points()
        .iter()
        .zip(ma7_series.into_iter().zip(ma60_series))
        .map(|(p, (ma7, ma60))| MovingAveragePoint {
            date: p.date,
            price: p.price,
            ma7,
            ma60,
        })
        .collect();

    Some(MovingAverageResult {
        current_price,
        ma7: short.map(|w| w.average),
        ma60: long.map(|w| w.average),
        ma7_z_score: short.map(|w| w.z_score).unwrap_or(0.0),
        ma60_z_score: long.map(|w| w.z_score).unwrap_or(0.0),
        ma7_std_dev: short.map(|w| w.std_dev).unwrap_or(0.0),
        ma60_std_dev: long.map(|w| w.std_dev).unwrap_or(0.0),
        score: ((short_score + long_score) / 2.0).round(),
        price_above_ma7: short.map(|w| current_price > w.average),
        price_above_ma60: long.map(|w| current_price > w.average),
        per_point,
    })
}
