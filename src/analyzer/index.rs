use crate::model::{IndexBreakdownRow, IndexCategory, IndexResult, WeightsError};
use crate::utils::clamp_score;
use std::collections::HashMap;

/// Score assumed for a category that was never supplied.
pub const ABSENT_CATEGORY_SCORE: f64 = 100.0;

/// Per-category integer weights, always covering every category and summing to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexWeights {
    entries: Vec<(IndexCategory, u32)>,
}

impl IndexWeights {
    /// Builds a custom table. Entries are kept in weight-table order regardless of input order.
    pub fn new(entries: &[(IndexCategory, u32)]) -> Result<Self, WeightsError> {
        let mut ordered = Vec::with_capacity(IndexCategory::ALL.len());
        for category in IndexCategory::ALL {
            let weight = entries
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, w)| *w)
                .ok_or(WeightsError::MissingCategory(category))?;
            ordered.push((category, weight));
        }
        let sum: u32 = ordered.iter().map(|(_, w)| w).sum();
        if sum != 100 {
            return Err(WeightsError::BadSum(sum));
        }
        Ok(Self { entries: ordered })
    }

    pub fn get(&self, category: IndexCategory) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> &[(IndexCategory, u32)] {
        &self.entries
    }
}

impl Default for IndexWeights {
    fn default() -> Self {
        Self {
            entries: vec![
                (IndexCategory::RelatedNews, 15),
                (IndexCategory::InflationScore, 5),
                (IndexCategory::PredictedPrice, 20),
                (IndexCategory::LlmScore, 15),
                (IndexCategory::MovingAverage, 15),
                (IndexCategory::Volatility, 10),
                (IndexCategory::SocialMediaPresence, 10),
                (IndexCategory::SearchTrend, 10),
            ],
        }
    }
}

/// Combines category scores into the bounded composite index.
#[derive(Debug, Clone, Default)]
pub struct IndexCalculator {
    weights: IndexWeights,
}

impl IndexCalculator {
    pub fn new(weights: IndexWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &IndexWeights {
        &self.weights
    }

    /// Weighted sum over the full weight table. Categories missing from `scores`
    /// (or given a non-finite value) count as [`ABSENT_CATEGORY_SCORE`].
    pub fn calculate(&self, scores: &HashMap<IndexCategory, f64>) -> IndexResult {
        let breakdown: Vec<IndexBreakdownRow> = self
            .weights
            .entries()
            .iter()
            .map(|&(category, weight)| {
                let score = scores
                    .get(&category)
                    .copied()
                    .filter(|s| s.is_finite())
                    .unwrap_or(ABSENT_CATEGORY_SCORE);
                IndexBreakdownRow {
                    category,
                    weight,
                    score,
                    weighted_score: score / 100.0 * weight as f64,
                }
            })
            .collect();

        let sum: f64 = breakdown.iter().map(|row| row.weighted_score).sum();
        IndexResult {
            total: clamp_score(sum) as u8,
            breakdown,
        }
    }
}
