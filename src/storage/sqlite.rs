use crate::model::{PricePoint, StorageError};
use crate::storage::ScoreStore;
use crate::utils::parse_day;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

/// A persisted composite score.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredScore {
    pub product_id: String,
    pub score: u8,
    pub computed_at: DateTime<Utc>,
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database and makes sure the schema exists.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS composite_scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id TEXT NOT NULL,
                score INTEGER NOT NULL,
                computed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_composite_scores_product
                ON composite_scores (product_id, id);

            CREATE TABLE IF NOT EXISTS price_history (
                product_id TEXT NOT NULL,
                day TEXT NOT NULL,
                price REAL NOT NULL,
                PRIMARY KEY (product_id, day)
            );
            ",
        )?;
        Ok(Self { conn })
    }

    /// Appends a composite score for the product.
    pub fn save_composite_score(&self, product_id: &str, score: u8) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO composite_scores (product_id, score, computed_at) VALUES (?1, ?2, ?3)",
            params![product_id, score, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Most recent composite score for the product, if any.
    pub fn latest_score(&self, product_id: &str) -> Result<Option<StoredScore>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT score, computed_at FROM composite_scores
                 WHERE product_id = ?1 ORDER BY id DESC LIMIT 1",
                params![product_id],
                |row| Ok((row.get::<_, u8>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((score, computed_at)) => {
                let computed_at = DateTime::parse_from_rfc3339(&computed_at)
                    .map_err(|e| StorageError::InvalidDate(format!("{}: {}", computed_at, e)))?
                    .with_timezone(&Utc);
                Ok(Some(StoredScore {
                    product_id: product_id.to_string(),
                    score,
                    computed_at,
                }))
            }
            None => Ok(None),
        }
    }

    /// Records the price seen for a day, replacing an earlier entry for the same day.
    pub fn record_price(&self, product_id: &str, point: &PricePoint) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO price_history (product_id, day, price) VALUES (?1, ?2, ?3)",
            params![product_id, point.date.to_string(), point.price],
        )?;
        Ok(())
    }

    /// Stored history of the product, oldest first.
    pub fn load_price_history(&self, product_id: &str) -> Result<Vec<PricePoint>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT day, price FROM price_history WHERE product_id = ?1 ORDER BY day ASC")?;
        let rows = stmt.query_map(params![product_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (day, price) = row?;
            let date = parse_day(&day).ok_or_else(|| StorageError::InvalidDate(day.clone()))?;
            history.push(PricePoint::new(date, price));
        }
        Ok(history)
    }
}

#[async_trait::async_trait]
impl ScoreStore for Mutex<SqliteStorage> {
    async fn persist_composite_score(&self, product_id: &str, score: u8) -> Result<(), StorageError> {
        self.lock().await.save_composite_score(product_id, score)
    }
}
