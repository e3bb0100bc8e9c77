//! Time-to-buy recommendation engine.
//!
//! Turns a product's price history and a handful of external signals (news,
//! social buzz, language-model judges, search trend, inflation) into a single
//! composite index between 0 and 100.
//!
//! ```no_run
//! use buy_signal::orchestrator::{Collaborators, Orchestrator, ProductRequest};
//!
//! # async fn run(collaborators: Collaborators) {
//! let orchestrator = Orchestrator::new(collaborators);
//! let report = orchestrator
//!     .compute_index(ProductRequest::new("sku-1", "Espresso machine", 249.0))
//!     .await;
//! println!("index: {}", report.index.total);
//! # }
//! ```

pub mod analyzer;
pub mod config;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod services;
pub mod storage;
pub mod utils;

pub use analyzer::{IndexCalculator, IndexWeights};
pub use model::{IndexBreakdownRow, IndexCategory, IndexResult, PricePoint, PriceSeries};
pub use orchestrator::{Collaborators, InteractiveRun, Orchestrator, ProductRequest, RunReport};
