//! Developer tooling: read-only views of a running session.
//!
//! # Invariants
//! - Inspectors never mutate the session.

mod inspector;

pub use inspector::{RigInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "gazewalk-tools v0.1.0"
}
