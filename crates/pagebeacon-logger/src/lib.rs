//! PageBeacon Mirror Logger
//!
//! This crate provides leveled logging with two sinks:
//! - A console sink, written unconditionally and synchronously
//! - An injectable database sink, written best-effort in the background
//!
//! A sink failure is reported on the console side only and never reaches
//! the logger's caller.

pub mod logger;
pub mod record;
pub mod sink;
pub mod sqlite;
pub mod telemetry;

pub use logger::MirrorLogger;
pub use record::{LogLevel, LogRecord};
pub use sink::{LogSink, MemorySink, NoopSink, SinkError, SinkResult};
#[cfg(feature = "sqlite-sink")]
pub use sqlite::SqliteLogSink;
pub use telemetry::init_telemetry;
