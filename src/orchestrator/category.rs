use crate::analyzer::{moving_average, social_presence_score, virality, volatility};
use crate::model::{CategoryScore, IndexCategory, ServiceError};
use crate::orchestrator::RunContext;
use crate::orchestrator::state::{CategoryEvent, CategoryOutcome};
use crate::services::{JudgeVerdict, ServiceScore};
use crate::utils::clamp_score;
use thiserror::Error;
use tracing::{debug, warn};

/// Score substituted for a category whose acquisition failed.
pub const FALLBACK_SCORE: f64 = 50.0;

/// Judge score assumed when no judge answered, on the 0-10 scale.
const NEUTRAL_JUDGE_SCORE: f64 = 5.0;
const JUDGE_SCALE_MAX: f64 = 10.0;

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("collaborator reported: {0}")]
    Reported(String),
    #[error("score out of range: {0}")]
    OutOfRange(f64),
    #[error("price series has only {0} points")]
    InsufficientData(usize),
}

/// One dynamically acquired category, with its own way of producing a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStep {
    News,
    Llm,
    Social,
    Trend,
    Volatility,
    MovingAverage,
    Inflation,
}

impl CategoryStep {
    /// Evaluation order: weight-descending, ties in listed order.
    pub const ORDER: [CategoryStep; 7] = [
        CategoryStep::News,
        CategoryStep::Llm,
        CategoryStep::Social,
        CategoryStep::Trend,
        CategoryStep::Volatility,
        CategoryStep::MovingAverage,
        CategoryStep::Inflation,
    ];

    pub fn category(self) -> IndexCategory {
        match self {
            CategoryStep::News => IndexCategory::RelatedNews,
            CategoryStep::Llm => IndexCategory::LlmScore,
            CategoryStep::Social => IndexCategory::SocialMediaPresence,
            CategoryStep::Trend => IndexCategory::SearchTrend,
            CategoryStep::Volatility => IndexCategory::Volatility,
            CategoryStep::MovingAverage => IndexCategory::MovingAverage,
            CategoryStep::Inflation => IndexCategory::InflationScore,
        }
    }

    /// Produces a bounded score for this category.
    pub async fn produce(self, ctx: &RunContext) -> Result<CategoryScore, StepError> {
        let request = ctx.request();
        let collaborators = ctx.collaborators();
        match self {
            CategoryStep::News => accept(collaborators.news.score(&request.title).await?),
            CategoryStep::Trend => accept(
                collaborators
                    .trend
                    .score(&request.title, request.category.as_deref())
                    .await?,
            ),
            CategoryStep::Inflation => accept(collaborators.inflation.score().await?),
            CategoryStep::Llm => {
                let verdicts = collaborators.judge.score(&request.title, &request.description).await?;
                Ok(judge_score(&verdicts))
            }
            CategoryStep::Social => {
                let signal = collaborators.social.score(&request.title).await?;
                if let Some(err) = signal.error {
                    return Err(StepError::Reported(err));
                }
                let extended = bounded(signal.score)?;
                let buzz = signal.posts.as_deref().filter(|p| !p.is_empty()).map(virality);
                let score = social_presence_score(extended, buzz.as_ref());
                let rationale = match &buzz {
                    Some(v) => format!("{} posts, virality {}", v.post_count, v.composite_score),
                    None => "no post data".to_string(),
                };
                Ok(CategoryScore::with_rationale(score, rationale))
            }
            CategoryStep::Volatility => {
                let series = ctx.price_series().await;
                if series.len() < 2 {
                    return Err(StepError::InsufficientData(series.len()));
                }
                let result = volatility(&series.prices());
                Ok(CategoryScore::with_rationale(
                    result.score,
                    format!("daily return std-dev {:.4}", result.volatility),
                ))
            }
            CategoryStep::MovingAverage => {
                let series = ctx.price_series().await;
                match moving_average(series) {
                    Some(result) => Ok(CategoryScore::with_rationale(
                        result.score,
                        format!("z7 {:.2}, z60 {:.2}", result.ma7_z_score, result.ma60_z_score),
                    )),
                    None => Ok(CategoryScore::with_rationale(FALLBACK_SCORE, "insufficient price history")),
                }
            }
        }
    }
}

fn bounded(score: f64) -> Result<f64, StepError> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err(StepError::OutOfRange(score))
    }
}

fn accept(answer: ServiceScore) -> Result<CategoryScore, StepError> {
    if let Some(err) = answer.error {
        return Err(StepError::Reported(err));
    }
    Ok(CategoryScore {
        score: bounded(answer.score)?,
        rationale: answer.rationale,
        error: None,
    })
}

/// Averages the judges that answered with a usable 0-10 score and rescales to 0-100.
pub fn judge_score(verdicts: &[JudgeVerdict]) -> CategoryScore {
    let usable: Vec<f64> = verdicts
        .iter()
        .filter(|v| v.error.is_none())
        .filter_map(|v| v.score)
        .filter(|s| s.is_finite() && (0.0..=JUDGE_SCALE_MAX).contains(s))
        .collect();
    let average = if usable.is_empty() {
        NEUTRAL_JUDGE_SCORE
    } else {
        usable.iter().sum::<f64>() / usable.len() as f64
    };
    CategoryScore::with_rationale(
        clamp_score(average * 100.0 / JUDGE_SCALE_MAX),
        format!("{} of {} judges answered", usable.len(), verdicts.len()),
    )
}

/// Runs one step, substituting the fallback score on any failure.
pub async fn execute_step(step: CategoryStep, ctx: &RunContext) -> CategoryEvent {
    let category = step.category();
    let product_id = ctx.request().product_id.as_str();
    debug!(product_id, %category, "Fetching category score");

    let outcome = match step.produce(ctx).await {
        Ok(score) => {
            debug!(product_id, %category, score = score.score, "Category resolved");
            CategoryOutcome::Resolved(score)
        }
        Err(e) => {
            warn!(product_id, %category, "Category failed, using fallback {}: {}", FALLBACK_SCORE, e);
            CategoryOutcome::FailedFallback {
                score: CategoryScore {
                    score: FALLBACK_SCORE,
                    rationale: None,
                    error: Some(e.to_string()),
                },
                reason: e.to_string(),
            }
        }
    };
    CategoryEvent { category, outcome }
}
