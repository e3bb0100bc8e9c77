// Interactive mode: one category at a time, abandonable at any point.
use crate::analyzer::IndexCalculator;
use crate::model::{IndexCategory, IndexResult};
use crate::orchestrator::category::{CategoryStep, execute_step};
use crate::orchestrator::state::{CategoryEvent, RunProgress, RunState};
use crate::orchestrator::{RunContext, RunReport, finalize, full_score_set};
use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A live, sequential scoring run for a single product.
///
/// Events are produced lazily: nothing is fetched until [`next_event`](Self::next_event)
/// is awaited, and each category completes before the next one starts.
pub struct InteractiveRun {
    ctx: RunContext,
    calculator: IndexCalculator,
    progress: RunProgress,
    cancel: CancellationToken,
    next_step: usize,
    events: Vec<CategoryEvent>,
}

impl InteractiveRun {
    pub(crate) fn new(ctx: RunContext, calculator: IndexCalculator, cancel: CancellationToken) -> Self {
        Self {
            ctx,
            calculator,
            progress: RunProgress::new(&IndexCategory::DYNAMIC),
            cancel,
            next_step: 0,
            events: Vec::with_capacity(CategoryStep::ORDER.len()),
        }
    }

    /// Resolves the next category. `None` once every category is settled or
    /// the run has been cancelled.
    pub async fn next_event(&mut self) -> Option<CategoryEvent> {
        if self.abandoned() {
            return None;
        }
        let step = *CategoryStep::ORDER.get(self.next_step)?;
        self.progress.begin(step.category());

        let settled = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = execute_step(step, &self.ctx) => Some(event),
        };

        // A result that lands after cancellation is dropped unseen.
        let event = match settled {
            Some(event) if !self.cancel.is_cancelled() => event,
            _ => {
                self.abandoned();
                return None;
            }
        };

        self.progress.settle(&event);
        self.next_step += 1;
        self.events.push(event.clone());
        Some(event)
    }

    /// Adapts the run into a stream of category events.
    pub fn events(&mut self) -> impl Stream<Item = CategoryEvent> + '_ {
        futures::stream::unfold(self, |run| async move {
            let event = run.next_event().await?;
            Some((event, run))
        })
    }

    /// Category currently being computed (or up next), if the run is underway.
    pub fn current_category(&self) -> Option<IndexCategory> {
        match self.progress.run_state() {
            RunState::InProgress(category) => Some(category),
            _ => None,
        }
    }

    pub fn progress(&self) -> &RunProgress {
        &self.progress
    }

    /// Best-effort composite over whatever has settled so far, for display only.
    pub fn partial_breakdown(&self) -> IndexResult {
        self.calculator.calculate(&full_score_set(self.progress.scores()))
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn abandoned(&mut self) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        if self.progress.run_state() != RunState::Cancelled {
            info!(product_id = %self.ctx.request().product_id, "Interactive run abandoned");
            self.progress.cancel();
        }
        true
    }

    /// Drives the remaining categories, then computes and persists the
    /// composite. Returns `None` if the run was abandoned.
    pub async fn finish(mut self) -> Option<RunReport> {
        while self.next_event().await.is_some() {}
        if self.abandoned() {
            return None;
        }
        debug!(product_id = %self.ctx.request().product_id, "Interactive run settled, finalizing");
        let events = std::mem::take(&mut self.events);
        Some(finalize(&self.ctx, &self.calculator, &mut self.progress, events).await)
    }
}
