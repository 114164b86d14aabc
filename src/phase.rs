//! Phase-qualified event-name derivation.
//!
//! A base event name selects three listener lists over the course of one
//! dispatch: `before <name>` during capture, `<name>` and `after <name>`
//! during bubbling. The qualified forms are plain registry keys, not
//! first-class types, so a listener can always be registered under the
//! qualified string directly.

/// Returns the capture-phase registry key for `event`.
pub fn before(event: &str) -> String {
    format!("before {event}")
}

/// Returns the completion-phase registry key for `event`.
pub fn after(event: &str) -> String {
    format!("after {event}")
}
