// Price history resolution: known data, approximations and synthesis.

pub mod parser;
pub mod resolver;
pub mod synthesizer;

pub use resolver::PriceSeriesResolver;
pub use synthesizer::synthesize;
