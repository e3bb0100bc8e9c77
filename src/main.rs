use buy_signal::config::{AppConfig, ProductConfig, load_config};
use buy_signal::model::PricePoint;
use buy_signal::orchestrator::{Orchestrator, ProductRequest};
use buy_signal::services::collaborators_from_config;
use buy_signal::storage::{ScoreStore, SqliteStorage};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    // Load configuration from file
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Initialize storage (SQLite) with async access (wrapped in a Mutex)
    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let collaborators = match collaborators_from_config(
        &config.services,
        storage.clone() as Arc<dyn ScoreStore>,
        Duration::from_secs(config.request_timeout_seconds),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build collaborators: {}", e);
            return;
        }
    };
    let orchestrator = Orchestrator::new(collaborators);

    loop {
        info!("Products to process: {}", config.products.len());
        run_pass(&config, &orchestrator, &storage).await;

        if config.check_interval_seconds == 0 {
            break;
        }
        info!("Waiting {}s for the next pass...", config.check_interval_seconds);
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested.");
                break;
            }
        }
    }
}

/// Records today's prices, loads stored histories and scores every product.
async fn run_pass(config: &AppConfig, orchestrator: &Orchestrator, storage: &Arc<Mutex<SqliteStorage>>) {
    let mut requests = Vec::with_capacity(config.products.len());
    for product in &config.products {
        requests.push(build_request(product, storage).await);
    }

    let reports = orchestrator.compute_many(requests, config.max_concurrent_products).await;
    for report in reports {
        info!(
            "{}: index {} ({} fallbacks){}",
            report.product_id,
            report.index.total,
            report.events.iter().filter(|e| e.outcome.is_fallback()).count(),
            if report.persisted { "" } else { " [not persisted]" }
        );
    }
}

async fn build_request(product: &ProductConfig, storage: &Arc<Mutex<SqliteStorage>>) -> ProductRequest {
    let guard = storage.lock().await;
    let today = PricePoint::new(Utc::now().date_naive(), product.current_price);
    if let Err(e) = guard.record_price(&product.product_id, &today) {
        warn!("Price record failed for {}: {}", product.product_id, e);
    }
    let history = match guard.load_price_history(&product.product_id) {
        Ok(h) => Some(h),
        Err(e) => {
            warn!("History load failed for {}: {}", product.product_id, e);
            None
        }
    };

    ProductRequest {
        product_id: product.product_id.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        category: product.category.clone(),
        current_price: product.current_price,
        known_history: history,
    }
}
