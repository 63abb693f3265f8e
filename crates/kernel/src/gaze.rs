use gazewalk_common::TargetId;
use serde::{Deserialize, Serialize};

use crate::locomotion::sanitize_dt;

/// Slack allowed when comparing accumulated dwell time to the threshold, so
/// frame deltas that sum to the threshold in exact arithmetic still fire.
const TIME_EPSILON: f32 = 1e-5;

/// Fired once when a dwell reaches the hold threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeTrigger {
    /// What the user dwelled on; `None` when looking at nothing interactive.
    pub target: Option<TargetId>,
}

/// Dwell timer against the camera-forward ray.
///
/// # Invariants
/// - The timer resets to zero whenever the target changes or a trigger fires.
/// - At most one trigger fires per continuous dwell; re-arming needs a target
///   change or [`GazeTimer::reset`].
#[derive(Debug, Clone)]
pub struct GazeTimer {
    threshold: f32,
    timer: f32,
    target: Option<TargetId>,
    observed: bool,
    fired: bool,
}

impl GazeTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            timer: 0.0,
            target: None,
            observed: false,
            fired: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Seconds accumulated in the current dwell.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Target recorded for the current dwell.
    pub fn target(&self) -> Option<&TargetId> {
        self.target.as_ref()
    }

    /// Whether this dwell already fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Fill ratio for the gaze-progress indicator, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.timer / self.threshold).clamp(0.0, 1.0)
    }

    /// Advance the dwell by `dt` while looking at `current`.
    ///
    /// The first observation records the target without counting as a
    /// change, so a dwell can start on the very first frame.
    pub fn update(&mut self, dt: f32, current: Option<&TargetId>) -> Option<GazeTrigger> {
        let dt = sanitize_dt(dt);

        if !self.observed {
            self.observed = true;
            self.target = current.cloned();
        } else if self.target.as_ref() != current {
            tracing::trace!(from = ?self.target, to = ?current, "gaze target changed");
            self.target = current.cloned();
            self.timer = 0.0;
            self.fired = false;
            return None;
        }

        if self.fired {
            return None;
        }

        self.timer += dt;
        if self.timer + TIME_EPSILON < self.threshold {
            return None;
        }

        self.timer = 0.0;
        self.fired = true;
        tracing::debug!(target = ?self.target, "gaze trigger");
        Some(GazeTrigger {
            target: self.target.clone(),
        })
    }

    /// Re-arm the current dwell: timer to zero, target kept.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.fired = false;
    }

    /// Forget everything, including the recorded target.
    pub fn clear(&mut self) {
        *self = Self::new(self.threshold);
    }
}
