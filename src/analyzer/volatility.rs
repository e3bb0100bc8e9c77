use crate::analyzer::statistics::SeriesStats;
use crate::model::VolatilityResult;
use crate::utils::clamp_score;

/// Scale turning daily-return dispersion into score points: 4% daily σ already scores 0.
const VOLATILITY_SCALE: f64 = 2500.0;

/// Scores price stability: the sample standard deviation of daily returns,
/// mapped so that a perfectly flat history scores 100.
pub fn volatility(prices: &[f64]) -> VolatilityResult {
    let returns = SeriesStats::daily_returns(prices);
    let volatility = if returns.len() < 2 {
        0.0
    } else {
        SeriesStats::sample_std_dev(&returns)
    };
    let penalty = (volatility * VOLATILITY_SCALE).min(100.0);

    VolatilityResult {
        volatility,
        score: clamp_score(100.0 - penalty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_is_perfectly_stable() {
        let r = volatility(&[100.0; 10]);
        assert_eq!(r.volatility, 0.0);
        assert_eq!(r.score, 100.0);

        let r = volatility(&[42.0, 42.0]);
        assert_eq!(r.volatility, 0.0);
        assert_eq!(r.score, 100.0);
    }

    #[test]
    fn fewer_than_two_returns_is_zero_volatility() {
        assert_eq!(volatility(&[]).score, 100.0);
        assert_eq!(volatility(&[10.0, 20.0]).volatility, 0.0);
    }

    #[test]
    fn wilder_series_never_scores_higher() {
        let calm = volatility(&[100.0, 100.5, 100.0, 100.5, 100.0, 100.5]);
        let choppy = volatility(&[100.0, 101.0, 100.0, 101.0, 100.0, 101.0]);
        let wild = volatility(&[100.0, 110.0, 95.0, 112.0, 90.0, 115.0]);

        assert!(choppy.volatility > calm.volatility);
        assert!(wild.volatility > choppy.volatility);
        assert!(choppy.score <= calm.score);
        assert!(wild.score <= choppy.score);
        assert_eq!(wild.score, 0.0);
    }

    #[test]
    fn score_matches_formula() {
        let prices = [100.0, 101.0, 100.0, 101.0];
        let r = volatility(&prices);
        let expected = (100.0 - (r.volatility * 2500.0).min(100.0)).clamp(0.0, 100.0).round();
        assert_eq!(r.score, expected);
        assert!(r.score > 0.0 && r.score < 100.0);
    }
}
