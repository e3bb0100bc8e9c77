use crate::analyzer::moving_average::MIN_POINTS;
use crate::history::parser::{HistoryParser, PriceLineParser};
use crate::history::synthesizer::{SYNTHETIC_DAYS, synthesize};
use crate::model::{PricePoint, PriceSeries};
use crate::services::PriceApproximator;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Days of history requested from the language-model approximator.
pub const APPROXIMATION_DAYS: u32 = 100;

/// Obtains a price series for a product: known history when usable, a
/// language-model approximation when configured, a deterministic synthesis otherwise.
pub struct PriceSeriesResolver {
    approximator: Option<Arc<dyn PriceApproximator>>,
    parser: PriceLineParser,
    today: Option<NaiveDate>,
}

impl PriceSeriesResolver {
    pub fn new(approximator: Option<Arc<dyn PriceApproximator>>) -> Self {
        Self {
            approximator,
            parser: PriceLineParser::new(),
            today: None,
        }
    }

    /// Anchors synthesized series at a fixed day instead of today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Last day of a synthesized series, read at call time unless pinned.
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Known history if it holds at least two valid points, otherwise a
    /// synthesized series of `min_points` days.
    pub fn resolve(
        &self,
        product_id: &str,
        current_price: f64,
        known_history: Option<&[PricePoint]>,
        min_points: usize,
    ) -> PriceSeries {
        if let Some(history) = known_history {
            let series = PriceSeries::from_points(history.iter().copied());
            if series.len() >= 2 {
                debug!(product_id, points = series.len(), "Using known price history");
                return series;
            }
        }
        debug!(product_id, days = min_points, "Synthesizing price history");
        synthesize(product_id, current_price, min_points, self.today())
    }

    /// Series long enough for the trend models: known history when it has
    /// enough points, else the approximator, else the synthesizer.
    pub async fn resolve_for_trend(
        &self,
        product_id: &str,
        title: &str,
        current_price: f64,
        known_history: Option<&[PricePoint]>,
    ) -> PriceSeries {
        if let Some(history) = known_history {
            let series = PriceSeries::from_points(history.iter().copied());
            if series.len() >= MIN_POINTS {
                debug!(product_id, points = series.len(), "Using known price history");
                return series;
            }
        }

        if let Some(approximator) = &self.approximator {
            match approximator.approximate_history(title, current_price, APPROXIMATION_DAYS).await {
                Ok(text) => match self.parser.parse(&text, current_price) {
                    Some(series) => {
                        info!(product_id, points = series.len(), "Using approximated price history");
                        return series;
                    }
                    None => warn!(product_id, "Approximated history had too few valid lines"),
                },
                Err(e) => warn!(product_id, "Price history approximation failed: {}", e),
            }
        }

        synthesize(product_id, current_price, SYNTHETIC_DAYS, self.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceError;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedApproximator {
        answer: Result<String, ()>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PriceApproximator for FixedApproximator {
        async fn approximate_history(&self, _title: &str, _price: f64, _days: u32) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone().map_err(|_| ServiceError::Timeout)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
    }

    fn history(n: usize) -> Vec<PricePoint> {
        (0..n)
            .map(|i| PricePoint::new(today() - Duration::days(i as i64), 100.0 + i as f64))
            .collect()
    }

    fn approximator(answer: Result<String, ()>) -> Arc<FixedApproximator> {
        Arc::new(FixedApproximator {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn two_known_points_are_enough_and_sorted() {
        let resolver = PriceSeriesResolver::new(None).with_today(today());
        let series = resolver.resolve("p", 50.0, Some(history(2).as_slice()), 30);
        assert_eq!(series.len(), 2);
        assert!(series.points()[0].date < series.points()[1].date);
        // Known history is returned as recorded.
        assert_eq!(series.last().unwrap().price, 100.0);
    }

    #[test]
    fn invalid_known_points_trigger_synthesis() {
        let resolver = PriceSeriesResolver::new(None).with_today(today());
        let known = vec![PricePoint::new(today(), f64::INFINITY), PricePoint::new(today(), 10.0)];
        let series = resolver.resolve("p", 50.0, Some(known.as_slice()), 30);
        assert_eq!(series.len(), 30);
        assert_eq!(series.last().unwrap().price, 50.0);
    }

    #[test]
    fn unpinned_resolver_ends_synthesis_on_the_current_day() {
        let resolver = PriceSeriesResolver::new(None);
        let before = Utc::now().date_naive();
        let last = resolver.resolve("p", 50.0, None, 10).last().unwrap().date;
        let after = Utc::now().date_naive();
        assert!(last == before || last == after);
        assert!(last > today());
    }

    #[tokio::test]
    async fn long_known_history_skips_approximation() {
        let approx = approximator(Ok(String::new()));
        let resolver = PriceSeriesResolver::new(Some(approx.clone() as Arc<dyn PriceApproximator>)).with_today(today());
        let series = resolver.resolve_for_trend("p", "t", 50.0, Some(history(10).as_slice())).await;
        assert_eq!(series.len(), 10);
        assert_eq!(approx.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_history_uses_approximation() {
        let text: String = (1..=8).map(|d| format!("2025-03-{d:02},{}\n", 60 + d)).collect();
        let approx = approximator(Ok(text));
        let resolver = PriceSeriesResolver::new(Some(approx.clone() as Arc<dyn PriceApproximator>)).with_today(today());
        let series = resolver.resolve_for_trend("p", "t", 50.0, Some(history(3).as_slice())).await;
        assert_eq!(series.len(), 8);
        assert_eq!(series.last().unwrap().price, 50.0);
        assert_eq!(approx.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_history_asks_approximator_first() {
        let text: String = (1..=7).map(|d| format!("2025-03-{d:02},{}\n", 60 + d)).collect();
        let approx = approximator(Ok(text));
        let resolver = PriceSeriesResolver::new(Some(approx.clone() as Arc<dyn PriceApproximator>)).with_today(today());
        let series = resolver.resolve_for_trend("p", "t", 50.0, None).await;
        assert_eq!(series.len(), 7);
        assert_eq!(approx.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_or_thin_approximation_falls_back_to_synthesis() {
        for answer in [Err(()), Ok("2025-03-01,10\n".to_string())] {
            let resolver = PriceSeriesResolver::new(Some(approximator(answer) as Arc<dyn PriceApproximator>)).with_today(today());
            let series = resolver.resolve_for_trend("p", "t", 50.0, None).await;
            assert_eq!(series, synthesize("p", 50.0, SYNTHETIC_DAYS, today()));
        }
    }
}
