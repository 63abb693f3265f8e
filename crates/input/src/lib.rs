//! Input mapping: keyboard, touch joystick and gaze targets produce shared intents.
//!
//! # Invariants
//! - Desktop and VR paths read the same `InputIntent` record.
//! - No input handler errors; unknown keys and degenerate rays are ignored.

pub mod action;
pub mod intent;
pub mod keymap;
pub mod targets;
pub mod touch;

pub use action::{Action, GazeBindings};
pub use intent::{InputIntent, Intent};
pub use keymap::KeyMap;
pub use targets::{Aabb, GazeTarget, GazeTargets};
pub use touch::{TouchJoystick, TouchThresholds};

pub fn crate_info() -> &'static str {
    "gazewalk-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
