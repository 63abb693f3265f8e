//! Gazewalk kernel: gaze dwell timer, locomotion integrator and the
//! per-frame session tick that drives both.
//!
//! # Invariants
//! - All session state is mutated from the tick and the input handlers only.
//! - A gaze-triggered move cannot be interrupted; triggers are ignored while
//!   one is in flight.
//! - A zero frame delta changes no position and no timer.

pub mod config;
pub mod gaze;
pub mod locomotion;
pub mod rig;
pub mod session;
pub mod xr;

pub use config::{ConfigError, LocomotionConfig, RigConfig, SessionConfig};
pub use gaze::{GazeTimer, GazeTrigger};
pub use locomotion::{ActiveMove, LocomotionIntegrator, LocomotionState, MoveBound, MoveCommand};
pub use rig::UserRig;
pub use session::{FrameReport, PathMode, Session, SessionEvent};
pub use xr::{HeadPose, NoXr, SimulatedXr, XrSession};

pub fn crate_info() -> &'static str {
    "gazewalk-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_info_names_package() {
        assert_eq!(crate_info(), "gazewalk-kernel v0.1.0");
    }
}
