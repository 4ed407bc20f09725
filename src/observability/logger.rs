//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering
//! - Explicit severity levels, filtered by a process-wide floor
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-value detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Rejected configuration or input
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(level: u8) -> Severity {
        match level {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Sets the lowest severity that is written
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Lowest severity currently written
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Whether an event at `severity` would be written
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key)
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        if severity >= Severity::Warn {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    /// Renders one log line
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        // event and severity lead, then fields by key
        let mut output = String::with_capacity(256);
        output.push('{');
        push_pair(&mut output, "event", event);
        output.push(',');
        push_pair(&mut output, "severity", severity.as_str());
        for (key, value) in sorted_fields {
            output.push(',');
            push_pair(&mut output, key, value);
        }
        output.push('}');
        output.push('\n');
        output
    }

    /// Internal log implementation that writes to a given writer
    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let output = Self::render(severity, event, fields);
        // Write atomically (one syscall)
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

fn push_pair(output: &mut String, key: &str, value: &str) {
    output.push_str(&Value::from(key).to_string());
    output.push(':');
    output.push_str(&Value::from(value).to_string());
}

/// Capture logs to a buffer for testing
#[cfg(test)]
fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
fn parse_line(line: &str) -> serde_json::Map<String, Value> {
    match serde_json::from_str(line).unwrap() {
        Value::Object(map) => map,
        other => panic!("log line is not an object: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Trace.as_str(), "TRACE");
        assert_eq!(Severity::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(Severity::Info, "TEST_EVENT", &[]);
        let parsed = parse_line(&output);
        assert_eq!(parsed["event"], "TEST_EVENT");
        assert_eq!(parsed["severity"], "INFO");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture_log(Severity::Info, "TEST", &[("zebra", "1"), ("apple", "2")]);
        let output2 = capture_log(Severity::Info, "TEST", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(output1, output2);
        assert!(output1.find("apple").unwrap() < output1.find("zebra").unwrap());
        assert!(output1.starts_with(r#"{"event":"TEST","severity":"INFO""#));
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture_log(Severity::Warn, "TEST", &[("reason", "bad \"zone\"\nline2")]);
        let parsed = parse_line(&output);
        assert_eq!(parsed["reason"], "bad \"zone\"\nline2");
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
    }

    #[test]
    fn test_severity_floor() {
        let previous = Logger::min_severity();
        Logger::set_min_severity(Severity::Warn);
        assert!(!Logger::enabled(Severity::Info));
        assert!(Logger::enabled(Severity::Error));
        Logger::set_min_severity(previous);
    }
}
