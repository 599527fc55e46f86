//! Log sink trait and test doubles

use crate::record::LogRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for the logger's best-effort persistence pass.
///
/// Implementations own their connection lifecycle. Errors returned here are
/// reported on the console side only; they never reach the logger's caller.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Persist a single record
    async fn write(&self, record: &LogRecord) -> SinkResult<()>;
}

/// Sink that discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn write(&self, _record: &LogRecord) -> SinkResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests
#[derive(Debug, Default)]
pub struct MemorySink {
    records: tokio::sync::Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far
    pub async fn records(&self) -> Vec<LogRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn write(&self, record: &LogRecord) -> SinkResult<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogLevel;

    #[tokio::test]
    async fn test_noop_sink_accepts_records() {
        let sink = NoopSink;
        let record = LogRecord::new(LogLevel::Info, "x");
        assert!(sink.write(&record).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_sink_captures_records() {
        let sink = MemorySink::new();
        sink.write(&LogRecord::new(LogLevel::Warn, "first")).await.unwrap();
        sink.write(&LogRecord::new(LogLevel::Error, "second")).await.unwrap();

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].level, LogLevel::Error);
    }
}
