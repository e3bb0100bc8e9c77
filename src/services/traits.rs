use crate::model::{PostMetric, ServiceError};
use serde::Deserialize;

/// Score returned by a single-signal collaborator (news, trend, inflation).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceScore {
    pub score: f64,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceScore {
    pub fn neutral(rationale: impl Into<String>) -> Self {
        Self {
            score: 50.0,
            rationale: Some(rationale.into()),
            error: None,
        }
    }
}

/// Social collaborator answer: an extended buzz score plus optional raw posts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialSignal {
    pub score: f64,
    #[serde(default)]
    pub posts: Option<Vec<PostMetric>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Verdict of one language-model judge, on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JudgeVerdict {
    pub judge: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[async_trait::async_trait]
pub trait NewsService: Send + Sync {
    async fn score(&self, product_title: &str) -> Result<ServiceScore, ServiceError>;
}

#[async_trait::async_trait]
pub trait LanguageModelJudge: Send + Sync {
    async fn score(&self, title: &str, description: &str) -> Result<Vec<JudgeVerdict>, ServiceError>;
}

#[async_trait::async_trait]
pub trait SocialService: Send + Sync {
    async fn score(&self, product_title: &str) -> Result<SocialSignal, ServiceError>;
}

#[async_trait::async_trait]
pub trait TrendService: Send + Sync {
    async fn score(&self, product_title: &str, category: Option<&str>) -> Result<ServiceScore, ServiceError>;
}

#[async_trait::async_trait]
pub trait InflationService: Send + Sync {
    async fn score(&self) -> Result<ServiceScore, ServiceError>;
}

/// Language-model backed guess of past prices, answered as `YYYY-MM-DD,price` lines.
#[async_trait::async_trait]
pub trait PriceApproximator: Send + Sync {
    async fn approximate_history(&self, title: &str, current_price: f64, days: u32) -> Result<String, ServiceError>;
}
