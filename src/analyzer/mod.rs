// Analyzer module: the pure scoring models and the composite index.

pub mod index;
pub mod moving_average;
pub mod statistics;
pub mod virality;
pub mod volatility;

// Re-export the entry points for ease of use.
pub use index::{IndexCalculator, IndexWeights};
pub use moving_average::moving_average;
pub use virality::{social_presence_score, virality};
pub use volatility::volatility;
