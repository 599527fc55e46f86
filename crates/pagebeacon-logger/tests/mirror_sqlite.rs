#![cfg(feature = "sqlite-sink")]

//! End-to-end test: MirrorLogger draining into the SQLite sink

use pagebeacon_logger::{MirrorLogger, SqliteLogSink};
use serde_json::json;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

#[tokio::test]
async fn test_logged_records_land_in_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("logs.db");

    let sink = Arc::new(SqliteLogSink::new(&db_path).await.unwrap());
    let logger = MirrorLogger::new(sink);

    logger.info("page served", None);
    logger.error("upstream failed", Some(json!({"status": 502})));

    logger.shutdown().await;

    // Read back through a fresh connection to the same file
    let pool = SqlitePool::connect_with(SqliteConnectOptions::new().filename(&db_path))
        .await
        .unwrap();

    let rows: Vec<(String, String, Option<String>)> =
        sqlx::query_as("SELECT level, message, details FROM logs ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], ("info".to_string(), "page served".to_string(), None));
    assert_eq!(rows[1].0, "error");
    assert_eq!(rows[1].1, "upstream failed");
    assert_eq!(rows[1].2.as_deref(), Some("{\"status\":502}"));
}
