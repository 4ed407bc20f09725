//! Observable events of the type registry
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Registry constructed and ready for lookups
    RegistryReady,
    /// Configuration file loaded
    ConfigLoaded,
    /// Validator parameter failed its check
    ParamRejected,
    /// Date cast asked for an unknown time zone
    TimezoneRejected,
    /// A value failed a type test or validator
    ValueRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RegistryReady => "REGISTRY_READY",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ParamRejected => "PARAM_REJECTED",
            Event::TimezoneRejected => "TIMEZONE_REJECTED",
            Event::ValueRejected => "VALUE_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RegistryReady | Event::ValueRejected => Severity::Trace,
            Event::ConfigLoaded => Severity::Info,
            Event::ParamRejected | Event::TimezoneRejected => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
