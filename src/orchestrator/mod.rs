//! Drives acquisition of every category score for a product and turns them
//! into the persisted composite index.
//!
//! Two modes share the same steps and calculator: [`Orchestrator::compute_index`]
//! fans categories out in groups, [`Orchestrator::interactive`] resolves them one
//! at a time and reports each as it settles.

pub mod batch;
pub mod category;
pub mod interactive;
pub mod state;

pub use category::{CategoryStep, FALLBACK_SCORE};
pub use interactive::InteractiveRun;
pub use state::{CategoryEvent, CategoryOutcome, CategoryState, RunProgress, RunState};

use crate::analyzer::IndexCalculator;
use crate::history::PriceSeriesResolver;
use crate::model::{IndexCategory, IndexResult, PricePoint, PriceSeries};
use crate::services::{InflationService, LanguageModelJudge, NewsService, PriceApproximator, SocialService, TrendService};
use crate::storage::ScoreStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Placeholder score of the not-yet-modelled predicted-price category.
pub const PREDICTED_PRICE_SCORE: f64 = 100.0;

/// External collaborators consulted during a run.
pub struct Collaborators {
    pub news: Arc<dyn NewsService>,
    pub judge: Arc<dyn LanguageModelJudge>,
    pub social: Arc<dyn SocialService>,
    pub trend: Arc<dyn TrendService>,
    pub inflation: Arc<dyn InflationService>,
    pub approximator: Option<Arc<dyn PriceApproximator>>,
    pub storage: Arc<dyn ScoreStore>,
}

/// The product being scored.
#[derive(Debug, Clone)]
pub struct ProductRequest {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub current_price: f64,
    pub known_history: Option<Vec<PricePoint>>,
}

impl ProductRequest {
    pub fn new(product_id: impl Into<String>, title: impl Into<String>, current_price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            description: String::new(),
            category: None,
            current_price,
            known_history: None,
        }
    }

    pub fn with_history(mut self, history: Vec<PricePoint>) -> Self {
        self.known_history = Some(history);
        self
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub product_id: String,
    pub index: IndexResult,
    /// Settled categories in evaluation order.
    pub events: Vec<CategoryEvent>,
    pub persisted: bool,
}

/// State owned by a single run; dropped with it.
pub struct RunContext {
    request: ProductRequest,
    collaborators: Arc<Collaborators>,
    resolver: Arc<PriceSeriesResolver>,
    series: OnceCell<PriceSeries>,
}

impl RunContext {
    pub fn request(&self) -> &ProductRequest {
        &self.request
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Price series shared by the price models; resolved on first use only.
    pub async fn price_series(&self) -> &PriceSeries {
        self.series
            .get_or_init(|| {
                self.resolver.resolve_for_trend(
                    &self.request.product_id,
                    &self.request.title,
                    self.request.current_price,
                    self.request.known_history.as_deref(),
                )
            })
            .await
    }
}

pub struct Orchestrator {
    collaborators: Arc<Collaborators>,
    resolver: Arc<PriceSeriesResolver>,
    calculator: IndexCalculator,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        let resolver = PriceSeriesResolver::new(collaborators.approximator.clone());
        Self {
            collaborators: Arc::new(collaborators),
            resolver: Arc::new(resolver),
            calculator: IndexCalculator::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: PriceSeriesResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_calculator(mut self, calculator: IndexCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    fn context(&self, request: ProductRequest) -> RunContext {
        RunContext {
            request,
            collaborators: self.collaborators.clone(),
            resolver: self.resolver.clone(),
            series: OnceCell::new(),
        }
    }

    /// Starts a sequential run that advances one category per call to
    /// [`InteractiveRun::next_event`]. Cancelling `cancel` abandons it.
    pub fn interactive(&self, request: ProductRequest, cancel: CancellationToken) -> InteractiveRun {
        InteractiveRun::new(self.context(request), self.calculator.clone(), cancel)
    }
}

/// Calculator input for a full run: settled scores plus the fixed predicted price.
pub(crate) fn full_score_set(settled: &HashMap<IndexCategory, f64>) -> HashMap<IndexCategory, f64> {
    let mut scores = settled.clone();
    scores.insert(IndexCategory::PredictedPrice, PREDICTED_PRICE_SCORE);
    scores
}

/// Computes the composite from a fully settled run and persists it once.
pub(crate) async fn finalize(
    ctx: &RunContext,
    calculator: &IndexCalculator,
    progress: &mut RunProgress,
    mut events: Vec<CategoryEvent>,
) -> RunReport {
    debug_assert!(progress.all_done(), "finalize called on a partial run");
    let product_id = ctx.request.product_id.clone();
    let index = calculator.calculate(&full_score_set(progress.scores()));
    progress.complete();

    let persisted = match ctx
        .collaborators
        .storage
        .persist_composite_score(&product_id, index.total)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(product_id = %product_id, "Failed to persist composite score: {}", e);
            false
        }
    };

    let fallbacks = events.iter().filter(|e| e.outcome.is_fallback()).count();
    info!(product_id = %product_id, total = index.total, fallbacks, "Composite index computed");

    events.sort_by_key(|e| IndexCategory::DYNAMIC.iter().position(|c| *c == e.category));
    RunReport {
        product_id,
        index,
        events,
        persisted,
    }
}
