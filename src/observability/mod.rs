//! Observability
//!
//! Structured JSON lifecycle logging for model loading and search
//! compilation.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on compilation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use searchkit::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CompileStart, &[("entity", "pets")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ModelsLoaded, &[("dir", "/tmp/models"), ("entities", "2")]);
    }
}
