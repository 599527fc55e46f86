//! SQLite log sink implementation

#[cfg(feature = "sqlite-sink")]
use crate::record::LogRecord;
#[cfg(feature = "sqlite-sink")]
use crate::sink::{LogSink, SinkError, SinkResult};
#[cfg(feature = "sqlite-sink")]
use async_trait::async_trait;
#[cfg(feature = "sqlite-sink")]
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
#[cfg(feature = "sqlite-sink")]
use std::path::Path;

#[cfg(feature = "sqlite-sink")]
pub struct SqliteLogSink {
    pool: SqlitePool,
}

#[cfg(feature = "sqlite-sink")]
impl SqliteLogSink {
    /// Open (or create) the database at `db_path` and ensure the `logs`
    /// table exists.
    pub async fn new(db_path: &Path) -> SinkResult<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(SinkError::Io)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(db_path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal),
            )
            .await
            .map_err(|e| SinkError::Database(e.to_string()))?;

        Self::initialize_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Build a sink over an existing pool, ensuring the `logs` table exists
    pub async fn from_pool(pool: SqlitePool) -> SinkResult<Self> {
        Self::initialize_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn initialize_schema(pool: &SqlitePool) -> SinkResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level TEXT NOT NULL,
                message TEXT NOT NULL,
                details TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| SinkError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(feature = "sqlite-sink")]
#[async_trait]
impl LogSink for SqliteLogSink {
    async fn write(&self, record: &LogRecord) -> SinkResult<()> {
        let details = record.details.as_ref().map(|d| d.to_string());

        sqlx::query("INSERT INTO logs (level, message, details, created_at) VALUES (?, ?, ?, ?)")
            .bind(record.level.as_str())
            .bind(&record.message)
            .bind(details)
            .bind(record.timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| SinkError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(all(test, feature = "sqlite-sink"))]
mod tests {
    use super::*;
    use crate::record::{LogLevel, LogRecord};
    use serde_json::json;

    async fn sink_in(dir: &tempfile::TempDir) -> SqliteLogSink {
        SqliteLogSink::new(&dir.path().join("logs.db")).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_with_details() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_in(&dir).await;

        let record = LogRecord::new(LogLevel::Error, "boom").with_details(json!({"a": 1}));
        sink.write(&record).await.unwrap();

        let (level, message, details): (String, String, Option<String>) =
            sqlx::query_as("SELECT level, message, details FROM logs")
                .fetch_one(&sink.pool)
                .await
                .unwrap();
        assert_eq!(level, "error");
        assert_eq!(message, "boom");
        assert_eq!(details.as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_insert_without_details_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_in(&dir).await;

        sink.write(&LogRecord::new(LogLevel::Info, "plain")).await.unwrap();

        let details: Option<String> = sqlx::query_scalar("SELECT details FROM logs")
            .fetch_one(&sink.pool)
            .await
            .unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.db");

        let first = SqliteLogSink::new(&path).await.unwrap();
        first.write(&LogRecord::new(LogLevel::Info, "kept")).await.unwrap();
        drop(first);

        // Reopening must not clobber existing rows
        let second = SqliteLogSink::new(&path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&second.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
