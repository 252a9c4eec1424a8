//! Observable compiler events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Models
    /// Model directory loaded and validated
    ModelsLoaded,

    // Compilation
    /// Search compile begins
    CompileStart,
    /// Search compile produced a predicate and ordering
    CompileComplete,
    /// Search compile rejected the request
    CompileRejected,
    /// New join handle created
    JoinCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ModelsLoaded => "MODELS_LOADED",
            Event::CompileStart => "COMPILE_BEGIN",
            Event::CompileComplete => "COMPILE_COMPLETE",
            Event::CompileRejected => "COMPILE_REJECTED",
            Event::JoinCreated => "JOIN_CREATED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::JoinCreated => Severity::Trace,
            Event::CompileRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ModelsLoaded,
            Event::CompileStart,
            Event::CompileComplete,
            Event::CompileRejected,
            Event::JoinCreated,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::CompileRejected.severity(), Severity::Warn);
        assert_eq!(Event::JoinCreated.severity(), Severity::Trace);
        assert_eq!(Event::CompileComplete.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::JoinCreated), "JOIN_CREATED");
    }
}
