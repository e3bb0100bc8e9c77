pub mod sqlite;

pub use sqlite::SqliteStorage;

use crate::model::StorageError;

/// Persistence of the final composite score of a run.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    async fn persist_composite_score(&self, product_id: &str, score: u8) -> Result<(), StorageError>;
}
