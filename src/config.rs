use crate::model::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeConfig {
    pub name: String,
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
}

/// Collaborator endpoints. A missing entry means the neutral stand-in is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub news: Option<EndpointConfig>,
    #[serde(default)]
    pub social: Option<EndpointConfig>,
    #[serde(default)]
    pub trend: Option<EndpointConfig>,
    #[serde(default)]
    pub inflation: Option<EndpointConfig>,
    #[serde(default)]
    pub price_history: Option<EndpointConfig>,
    #[serde(default)]
    pub judges: Vec<JudgeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub product_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub current_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Pause between batch passes; 0 runs a single pass.
    #[serde(default)]
    pub check_interval_seconds: u64,
    #[serde(default = "default_max_concurrent_products")]
    pub max_concurrent_products: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub services: ServicesConfig,
    pub products: Vec<ProductConfig>,
}

fn default_database_path() -> String {
    "data.db".into()
}

fn default_log_filter() -> String {
    "info".into()
}

fn default_max_concurrent_products() -> usize {
    4
}

fn default_request_timeout_seconds() -> u64 {
    20
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.products.is_empty() {
            return Err(ConfigError::Invalid("no products configured".into()));
        }
        let mut ids = HashSet::new();
        for product in &self.products {
            if !(product.current_price.is_finite() && product.current_price > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "product {} has invalid current_price {}",
                    product.product_id, product.current_price
                )));
            }
            if !ids.insert(product.product_id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate product_id {}", product.product_id)));
            }
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}
