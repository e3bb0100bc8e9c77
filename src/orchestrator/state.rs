use crate::model::{CategoryScore, IndexCategory};
use std::collections::{BTreeMap, HashMap};

/// Lifecycle of a single category within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryState {
    Pending,
    Fetching,
    Resolved,
    FailedFallback,
    Done,
}

impl CategoryState {
    /// Allowed moves: Pending → Fetching → {Resolved | FailedFallback} → Done.
    pub fn can_transition(self, next: CategoryState) -> bool {
        use CategoryState::*;
        matches!(
            (self, next),
            (Pending, Fetching) | (Fetching, Resolved) | (Fetching, FailedFallback) | (Resolved, Done) | (FailedFallback, Done)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    InProgress(IndexCategory),
    Complete,
    Cancelled,
}

/// How a category's score was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Resolved(CategoryScore),
    FailedFallback { score: CategoryScore, reason: String },
}

impl CategoryOutcome {
    pub fn score(&self) -> f64 {
        match self {
            CategoryOutcome::Resolved(s) => s.score,
            CategoryOutcome::FailedFallback { score, .. } => score.score,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CategoryOutcome::FailedFallback { .. })
    }
}

/// Emitted once per dynamic category when its score is settled.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEvent {
    pub category: IndexCategory,
    pub outcome: CategoryOutcome,
}

/// Transient bookkeeping for one orchestration run.
#[derive(Debug, Clone)]
pub struct RunProgress {
    states: BTreeMap<IndexCategory, CategoryState>,
    scores: HashMap<IndexCategory, f64>,
    run_state: RunState,
}

impl RunProgress {
    pub fn new(categories: &[IndexCategory]) -> Self {
        Self {
            states: categories.iter().map(|&c| (c, CategoryState::Pending)).collect(),
            scores: HashMap::new(),
            run_state: RunState::NotStarted,
        }
    }

    fn transition(&mut self, category: IndexCategory, next: CategoryState) {
        let state = self.states.entry(category).or_insert(CategoryState::Pending);
        debug_assert!(state.can_transition(next), "{category}: {state:?} -> {next:?}");
        *state = next;
    }

    /// Marks the category as being fetched and points the run at it.
    /// Idempotent while the category is already fetching.
    pub fn begin(&mut self, category: IndexCategory) {
        if self.state(category) != Some(CategoryState::Fetching) {
            self.transition(category, CategoryState::Fetching);
        }
        self.run_state = RunState::InProgress(category);
    }

    /// Records a settled category and advances the pointer to the next pending one.
    pub fn settle(&mut self, event: &CategoryEvent) {
        let settled = if event.outcome.is_fallback() {
            CategoryState::FailedFallback
        } else {
            CategoryState::Resolved
        };
        self.transition(event.category, settled);
        self.scores.insert(event.category, event.outcome.score());
        self.transition(event.category, CategoryState::Done);

        if let RunState::InProgress(current) = self.run_state {
            if current == event.category {
                if let Some(next) = self.next_pending() {
                    self.run_state = RunState::InProgress(next);
                }
            }
        }
    }

    pub fn complete(&mut self) {
        self.run_state = RunState::Complete;
    }

    pub fn cancel(&mut self) {
        self.run_state = RunState::Cancelled;
    }

    fn next_pending(&self) -> Option<IndexCategory> {
        IndexCategory::DYNAMIC
            .iter()
            .copied()
            .find(|c| self.states.get(c) == Some(&CategoryState::Pending))
    }

    pub fn state(&self, category: IndexCategory) -> Option<CategoryState> {
        self.states.get(&category).copied()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Scores settled so far.
    pub fn scores(&self) -> &HashMap<IndexCategory, f64> {
        &self.scores
    }

    pub fn all_done(&self) -> bool {
        self.states.values().all(|s| *s == CategoryState::Done)
    }
}
