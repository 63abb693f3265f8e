//! Shared types for the viewer core.
//!
//! # Invariants
//! - Types here carry no behavior beyond construction and formatting.
//! - Time is always expressed in seconds as `f32`.

mod clock;
mod types;

pub use clock::{Clock, FixedClock, FrameTime, MAX_FRAME_DELTA, SystemClock};
pub use types::{TargetId, Transform};

pub fn crate_info() -> &'static str {
    "gazewalk-common v0.1.0"
}
