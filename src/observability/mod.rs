//! Observability for the type registry
//!
//! Structured logging (JSON lines) of registry lifecycle and rejections.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use field_types::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event_with_fields(Event::TimezoneRejected, &[("timezone", "Mars/Olympus")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
