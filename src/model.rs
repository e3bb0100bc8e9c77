// Core structs: PricePoint, PriceSeries, IndexCategory, model results and errors
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One observed (or synthesized) price for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A point is usable when its price is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Chronological price history, sorted ascending by date with unique dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from arbitrary points: invalid prices are dropped, the
    /// rest sorted by date and duplicate dates collapsed to their first entry.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points.into_iter().filter(PricePoint::is_valid).collect();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Overwrites the most recent price so the series ends at the known price.
    pub(crate) fn pin_last_price(&mut self, price: f64) {
        if let Some(last) = self.points.last_mut() {
            last.price = price;
        }
    }
}

/// The closed set of scoring dimensions feeding the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexCategory {
    RelatedNews,
    InflationScore,
    PredictedPrice,
    LlmScore,
    MovingAverage,
    Volatility,
    SocialMediaPresence,
    SearchTrend,
}

impl IndexCategory {
    /// All categories in weight-table (display) order.
    pub const ALL: [IndexCategory; 8] = [
        IndexCategory::RelatedNews,
        IndexCategory::InflationScore,
        IndexCategory::PredictedPrice,
        IndexCategory::LlmScore,
        IndexCategory::MovingAverage,
        IndexCategory::Volatility,
        IndexCategory::SocialMediaPresence,
        IndexCategory::SearchTrend,
    ];

    /// Categories acquired during a run, in evaluation order.
    pub const DYNAMIC: [IndexCategory; 7] = [
        IndexCategory::RelatedNews,
        IndexCategory::LlmScore,
        IndexCategory::SocialMediaPresence,
        IndexCategory::SearchTrend,
        IndexCategory::Volatility,
        IndexCategory::MovingAverage,
        IndexCategory::InflationScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexCategory::RelatedNews => "relatedNews",
            IndexCategory::InflationScore => "inflationScore",
            IndexCategory::PredictedPrice => "predictedPrice",
            IndexCategory::LlmScore => "llmScore",
            IndexCategory::MovingAverage => "movingAverage",
            IndexCategory::Volatility => "volatility",
            IndexCategory::SocialMediaPresence => "socialMediaPresence",
            IndexCategory::SearchTrend => "searchTrend",
        }
    }
}

impl fmt::Display for IndexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded category score with optional context from the producer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub score: f64,
    pub rationale: Option<String>,
    pub error: Option<String>,
}

impl CategoryScore {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            rationale: None,
            error: None,
        }
    }

    pub fn with_rationale(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: Some(rationale.into()),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexBreakdownRow {
    pub category: IndexCategory,
    pub weight: u32,
    pub score: f64,
    pub weighted_score: f64,
}

/// Composite index together with its per-category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexResult {
    pub total: u8,
    pub breakdown: Vec<IndexBreakdownRow>,
}

/// One social post or mention with its engagement counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetric {
    pub reach: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub timestamp_ms: i64,
}

impl PostMetric {
    /// Weighted engagement of a single post: likes + 2*comments + 3*shares.
    pub fn engagement(&self) -> f64 {
        self.likes + 2.0 * self.comments + 3.0 * self.shares
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralityResult {
    pub reach: f64,
    pub engagement: f64,
    pub engagement_rate: f64,
    pub growth_rate: f64,
    pub network_amplification: f64,
    pub composite_score: f64,
    pub post_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityResult {
    pub volatility: f64,
    pub score: f64,
}

/// Moving averages aligned with one point of the input series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub ma7: Option<f64>,
    pub ma60: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverageResult {
    pub current_price: f64,
    pub ma7: Option<f64>,
    pub ma60: Option<f64>,
    pub ma7_z_score: f64,
    pub ma60_z_score: f64,
    pub ma7_std_dev: f64,
    pub ma60_std_dev: f64,
    pub score: f64,
    pub price_above_ma7: Option<bool>,
    pub price_above_ma60: Option<bool>,
    pub per_point: Vec<MovingAveragePoint>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("collaborator reported: {0}")]
    Reported(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weights sum to {0}, expected 100")]
    BadSum(u32),
    #[error("no weight for category {0}")]
    MissingCategory(IndexCategory),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn series_sorts_and_dedups_dates() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(day(3), 30.0),
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(3), 99.0),
            PricePoint::new(day(2), f64::NAN),
            PricePoint::new(day(2), 20.0),
        ]);
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(series.prices(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn dynamic_order_covers_everything_but_predicted_price() {
        for cat in IndexCategory::ALL {
            let dynamic = IndexCategory::DYNAMIC.contains(&cat);
            assert_eq!(dynamic, cat != IndexCategory::PredictedPrice, "{cat}");
        }
    }

    #[test]
    fn post_engagement_weights_comments_and_shares() {
        let post = PostMetric {
            reach: 1000.0,
            likes: 10.0,
            comments: 2.0,
            shares: 1.0,
            timestamp_ms: 0,
        };
        assert_eq!(post.engagement(), 17.0);
    }

    #[test]
    fn produced_results_use_camel_case_fields() {
        let row = IndexBreakdownRow {
            category: IndexCategory::LlmScore,
            weight: 25,
            score: 80.0,
            weighted_score: 20.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["category"], "llmScore");
        assert_eq!(json["weightedScore"], 20.0);
        assert!(json.get("weighted_score").is_none());

        let virality = ViralityResult {
            reach: 1000.0,
            engagement: 17.0,
            engagement_rate: 0.017,
            growth_rate: 0.0,
            network_amplification: 0.01,
            composite_score: 9.0,
            post_count: 1,
        };
        let json = serde_json::to_value(&virality).unwrap();
        assert_eq!(json["engagementRate"], 0.017);
        assert_eq!(json["compositeScore"], 9.0);
        assert_eq!(json["networkAmplification"], 0.01);
    }
}
