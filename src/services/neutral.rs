// Stand-ins for collaborators that have no configuration.
use crate::model::ServiceError;
use crate::services::traits::{
    InflationService, JudgeVerdict, LanguageModelJudge, NewsService, ServiceScore, SocialService, SocialSignal,
    TrendService,
};

const NOT_CONFIGURED: &str = "collaborator not configured";

/// Answers every request with a neutral score and no error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralService;

#[async_trait::async_trait]
impl NewsService for NeutralService {
    async fn score(&self, _product_title: &str) -> Result<ServiceScore, ServiceError> {
        Ok(ServiceScore::neutral(NOT_CONFIGURED))
    }
}

#[async_trait::async_trait]
impl LanguageModelJudge for NeutralService {
    async fn score(&self, _title: &str, _description: &str) -> Result<Vec<JudgeVerdict>, ServiceError> {
        Ok(Vec::new())
    }
}

#[async_trait::async_trait]
impl SocialService for NeutralService {
    async fn score(&self, _product_title: &str) -> Result<SocialSignal, ServiceError> {
        Ok(SocialSignal {
            score: 50.0,
            posts: None,
            error: None,
        })
    }
}

#[async_trait::async_trait]
impl TrendService for NeutralService {
    async fn score(&self, _product_title: &str, _category: Option<&str>) -> Result<ServiceScore, ServiceError> {
        Ok(ServiceScore::neutral(NOT_CONFIGURED))
    }
}

#[async_trait::async_trait]
impl InflationService for NeutralService {
    async fn score(&self) -> Result<ServiceScore, ServiceError> {
        Ok(ServiceScore::neutral(NOT_CONFIGURED))
    }
}
