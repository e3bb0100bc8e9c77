use crate::config::{EndpointConfig, JudgeConfig};
use crate::model::ServiceError;
use crate::services::traits::{
    InflationService, JudgeVerdict, LanguageModelJudge, NewsService, PriceApproximator, ServiceScore, SocialService,
    SocialSignal, TrendService,
};
use futures::future::join_all;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Builds the shared HTTP client used by every collaborator.
pub fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    let client = Client::builder()
        .user_agent("buy-signal/0.1")
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// A single JSON scoring endpoint.
#[derive(Clone)]
pub struct JsonEndpoint {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl JsonEndpoint {
    pub fn new(client: Client, cfg: &EndpointConfig) -> Self {
        Self {
            client,
            url: cfg.url.clone(),
            api_key: cfg.api_key.clone(),
        }
    }

    async fn send(&self, query: &[(&str, String)]) -> Result<Response, ServiceError> {
        let mut request = self.client.get(&self.url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        debug!(url = %self.url, "Calling collaborator");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout
            } else {
                ServiceError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "Collaborator responded with error status");
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<T, ServiceError> {
        let body = self.send(query).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    pub async fn get_text(&self, query: &[(&str, String)]) -> Result<String, ServiceError> {
        Ok(self.send(query).await?.text().await?)
    }
}

pub struct HttpNewsService(pub JsonEndpoint);

#[async_trait::async_trait]
impl NewsService for HttpNewsService {
    async fn score(&self, product_title: &str) -> Result<ServiceScore, ServiceError> {
        self.0.get_json(&[("title", product_title.to_string())]).await
    }
}

pub struct HttpSocialService(pub JsonEndpoint);

#[async_trait::async_trait]
impl SocialService for HttpSocialService {
    async fn score(&self, product_title: &str) -> Result<SocialSignal, ServiceError> {
        self.0.get_json(&[("title", product_title.to_string())]).await
    }
}

pub struct HttpTrendService(pub JsonEndpoint);

#[async_trait::async_trait]
impl TrendService for HttpTrendService {
    async fn score(&self, product_title: &str, category: Option<&str>) -> Result<ServiceScore, ServiceError> {
        let mut query = vec![("title", product_title.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        self.0.get_json(&query).await
    }
}

pub struct HttpInflationService(pub JsonEndpoint);

#[async_trait::async_trait]
impl InflationService for HttpInflationService {
    async fn score(&self) -> Result<ServiceScore, ServiceError> {
        self.0.get_json(&[]).await
    }
}

pub struct HttpPriceApproximator(pub JsonEndpoint);

#[async_trait::async_trait]
impl PriceApproximator for HttpPriceApproximator {
    async fn approximate_history(&self, title: &str, current_price: f64, days: u32) -> Result<String, ServiceError> {
        self.0
            .get_text(&[
                ("title", title.to_string()),
                ("current_price", current_price.to_string()),
                ("days", days.to_string()),
            ])
            .await
    }
}

#[derive(serde::Deserialize)]
struct JudgeAnswer {
    score: f64,
}

/// A panel of independently configured judges, asked concurrently.
pub struct HttpJudgePanel {
    judges: Vec<(String, JsonEndpoint)>,
}

impl HttpJudgePanel {
    pub fn new(client: Client, judges: &[JudgeConfig]) -> Self {
        Self {
            judges: judges
                .iter()
                .map(|j| (j.name.clone(), JsonEndpoint::new(client.clone(), &j.endpoint)))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl LanguageModelJudge for HttpJudgePanel {
    async fn score(&self, title: &str, description: &str) -> Result<Vec<JudgeVerdict>, ServiceError> {
        let query = [("title", title.to_string()), ("description", description.to_string())];
        let answers = join_all(self.judges.iter().map(|(name, endpoint)| {
            let query = &query;
            async move {
                match endpoint.get_json::<JudgeAnswer>(query).await {
                    Ok(answer) => JudgeVerdict {
                        judge: name.clone(),
                        score: Some(answer.score),
                        error: None,
                    },
                    Err(e) => {
                        warn!(judge = %name, "Judge failed: {}", e);
                        JudgeVerdict {
                            judge: name.clone(),
                            score: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        }))
        .await;
        Ok(answers)
    }
}
