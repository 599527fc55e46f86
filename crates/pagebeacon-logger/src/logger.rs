//! Dual-sink mirror logger
//!
//! The console write happens synchronously in the caller's frame. The sink
//! write is handed to a background worker over a bounded channel and may
//! land before or after the console write returns, or not at all: a full
//! buffer drops the record. No ordering is guaranteed between the sinks.

use crate::record::{LogLevel, LogRecord};
use crate::sink::LogSink;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Leveled logger mirroring the console into an injected sink
pub struct MirrorLogger {
    tx: Option<mpsc::Sender<LogRecord>>,
    worker_handle: Option<JoinHandle<()>>,
}

impl MirrorLogger {
    /// Create a logger mirroring into `sink`. Spawns the sink worker, so a
    /// Tokio runtime must be running.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_capacity(sink, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a logger with a custom channel capacity
    pub fn with_capacity(sink: Arc<dyn LogSink>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);

        let worker_handle = tokio::spawn(async move {
            Self::worker_loop(rx, sink).await;
        });

        Self {
            tx: Some(tx),
            worker_handle: Some(worker_handle),
        }
    }

    /// Create a logger with no database sink; records are only printed
    pub fn console_only() -> Self {
        Self {
            tx: None,
            worker_handle: None,
        }
    }

    /// Log a record to both sinks. The console write is synchronous; the
    /// sink write is queued and never blocks or fails the caller.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, details: Option<Value>) {
        let mut record = LogRecord::new(level, message);
        if let Some(details) = details {
            record = record.with_details(details);
        }

        Self::write_console(&record);

        if let Some(tx) = &self.tx {
            match tx.try_send(record) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("log sink buffer full, dropping record");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    error!("log sink worker is gone, dropping record");
                }
            }
        }
    }

    pub fn info(&self, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Info, message, details);
    }

    pub fn warn(&self, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Warn, message, details);
    }

    pub fn error(&self, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Error, message, details);
    }

    fn write_console(record: &LogRecord) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in record.console_lines() {
            let _ = writeln!(out, "{}", line);
        }
    }

    /// Background worker: one sink write per record, errors reported on the
    /// console side only
    async fn worker_loop(mut rx: mpsc::Receiver<LogRecord>, sink: Arc<dyn LogSink>) {
        while let Some(record) = rx.recv().await {
            if let Err(e) = sink.write(&record).await {
                error!(error = %e, "failed to write log record to sink");
            }
        }
        tracing::debug!("log sink worker exited");
    }

    /// Gracefully shut down: close the channel, drain pending records, and
    /// wait for the worker to finish. Consumes the logger.
    pub async fn shutdown(mut self) {
        self.tx.take();

        if let Some(handle) = self.worker_handle.take() {
            if handle.await.is_err() {
                error!("log sink worker panicked during shutdown");
            }
        }
    }
}

impl Drop for MirrorLogger {
    fn drop(&mut self) {
        // Worker shuts down when tx drops, but pending records may be lost
        if self.worker_handle.is_some() {
            warn!("MirrorLogger dropped without shutdown(); queued records may be unwritten");
        }
    }
}
