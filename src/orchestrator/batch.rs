// Batch mode: categories fanned out in groups, products processed concurrently.
use crate::model::IndexCategory;
use crate::orchestrator::category::{CategoryStep, execute_step};
use crate::orchestrator::state::RunProgress;
use crate::orchestrator::{Orchestrator, ProductRequest, RunReport, finalize};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::info;

/// Groups run one after another; steps inside a group run concurrently.
pub const BATCH_GROUPS: [&[CategoryStep]; 4] = [
    &[CategoryStep::News, CategoryStep::Inflation, CategoryStep::Llm],
    &[CategoryStep::Social],
    &[CategoryStep::Trend],
    &[CategoryStep::Volatility, CategoryStep::MovingAverage],
];

impl Orchestrator {
    /// Scores one product in batch mode and persists the composite.
    pub async fn compute_index(&self, request: ProductRequest) -> RunReport {
        let ctx = self.context(request);
        info!(product_id = %ctx.request().product_id, "Starting batch scoring run");

        let mut progress = RunProgress::new(&IndexCategory::DYNAMIC);
        let mut events = Vec::with_capacity(IndexCategory::DYNAMIC.len());

        for group in BATCH_GROUPS {
            for step in group {
                progress.begin(step.category());
            }
            let settled = join_all(group.iter().map(|&step| execute_step(step, &ctx))).await;
            for event in settled {
                progress.settle(&event);
                events.push(event);
            }
        }

        finalize(&ctx, &self.calculator, &mut progress, events).await
    }

    /// Scores many products with at most `max_concurrent` runs in flight.
    /// Reports come back in request order.
    pub async fn compute_many(&self, requests: Vec<ProductRequest>, max_concurrent: usize) -> Vec<RunReport> {
        info!(products = requests.len(), max_concurrent, "Starting batch over products");
        stream::iter(requests)
            .map(|request| self.compute_index(request))
            .buffered(max_concurrent.max(1))
            .collect()
            .await
    }
}
