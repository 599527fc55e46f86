//! Log levels, records, and console formatting

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity level. Lowercase on the wire and in storage; uppercased on the
/// console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Uppercase console form
    pub fn console_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach structured details
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Console rendering: one line per record, a second line when details
    /// are present.
    ///
    /// Shape: `[<ISO-8601 UTC>] <LEVEL>: <message>` / `Details: <value>`
    pub fn console_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "[{}] {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level.console_str(),
            self.message
        )];
        if let Some(details) = &self.details {
            lines.push(format!("Details: {}", details));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_record(level: LogLevel, message: &str) -> LogRecord {
        LogRecord {
            level,
            message: message.to_string(),
            details: None,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_level_forms() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Error.console_str(), "ERROR");
    }

    #[test]
    fn test_level_serde_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warn\"");
        let level: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, LogLevel::Error);
    }

    #[test]
    fn test_console_line_shape() {
        let lines = fixed_record(LogLevel::Error, "boom").console_lines();
        assert_eq!(lines, vec!["[2026-01-02T03:04:05.000Z] ERROR: boom"]);
    }

    #[test]
    fn test_console_details_line() {
        let record = fixed_record(LogLevel::Info, "ok").with_details(json!({"a": 1}));
        let lines = record.console_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[2026-01-02T03:04:05.000Z] INFO: ok");
        assert_eq!(lines[1], "Details: {\"a\":1}");
    }

    #[test]
    fn test_each_level_renders_uppercased() {
        for (level, expected) in [
            (LogLevel::Info, "INFO: x"),
            (LogLevel::Warn, "WARN: x"),
            (LogLevel::Error, "ERROR: x"),
        ] {
            let lines = fixed_record(level, "x").console_lines();
            assert_eq!(lines.len(), 1);
            assert!(lines[0].contains(expected), "line: {}", lines[0]);
        }
    }
}
