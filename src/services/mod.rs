// Collaborator contracts and their implementations.

pub mod http;
pub mod neutral;
pub mod traits;

pub use neutral::NeutralService;
pub use traits::{
    InflationService, JudgeVerdict, LanguageModelJudge, NewsService, PriceApproximator, ServiceScore, SocialService,
    SocialSignal, TrendService,
};

use crate::config::ServicesConfig;
use crate::model::ServiceError;
use crate::orchestrator::Collaborators;
use crate::storage::ScoreStore;
use http::{
    HttpInflationService, HttpJudgePanel, HttpNewsService, HttpPriceApproximator, HttpSocialService, HttpTrendService,
    JsonEndpoint, build_client,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Wires HTTP collaborators for every configured endpoint and neutral
/// stand-ins for the rest.
pub fn collaborators_from_config(
    cfg: &ServicesConfig,
    storage: Arc<dyn ScoreStore>,
    timeout: Duration,
) -> Result<Collaborators, ServiceError> {
    let client = build_client(timeout)?;
    let endpoint = |name: &str, cfg: &Option<crate::config::EndpointConfig>| {
        if cfg.is_none() {
            info!("No {} endpoint configured, using neutral scores", name);
        }
        cfg.as_ref().map(|c| JsonEndpoint::new(client.clone(), c))
    };

    let news: Arc<dyn NewsService> = match endpoint("news", &cfg.news) {
        Some(e) => Arc::new(HttpNewsService(e)),
        None => Arc::new(NeutralService),
    };
    let social: Arc<dyn SocialService> = match endpoint("social", &cfg.social) {
        Some(e) => Arc::new(HttpSocialService(e)),
        None => Arc::new(NeutralService),
    };
    let trend: Arc<dyn TrendService> = match endpoint("trend", &cfg.trend) {
        Some(e) => Arc::new(HttpTrendService(e)),
        None => Arc::new(NeutralService),
    };
    let inflation: Arc<dyn InflationService> = match endpoint("inflation", &cfg.inflation) {
        Some(e) => Arc::new(HttpInflationService(e)),
        None => Arc::new(NeutralService),
    };
    let approximator: Option<Arc<dyn PriceApproximator>> = endpoint("price history", &cfg.price_history)
        .map(|e| Arc::new(HttpPriceApproximator(e)) as Arc<dyn PriceApproximator>);
    let judge: Arc<dyn LanguageModelJudge> = if cfg.judges.is_empty() {
        info!("No judges configured, using neutral scores");
        Arc::new(NeutralService)
    } else {
        Arc::new(HttpJudgePanel::new(client.clone(), &cfg.judges))
    };

    Ok(Collaborators {
        news,
        judge,
        social,
        trend,
        inflation,
        approximator,
        storage,
    })
}
