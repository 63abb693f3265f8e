use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tolerance when deciding a duration-bound move has used up its time.
const TIME_EPSILON: f32 = 1e-5;
/// Tolerance, in meters, when deciding the next step reaches the target.
const DISTANCE_EPSILON: f32 = 1e-4;

/// How a discrete move ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveBound {
    /// Keep moving for this many seconds.
    Duration { seconds: f32 },
    /// Move this many meters, then snap onto the target.
    Distance { meters: f32 },
}

impl Default for MoveBound {
    fn default() -> Self {
        Self::Duration { seconds: 3.0 }
    }
}

impl MoveBound {
    pub fn magnitude(&self) -> f32 {
        match *self {
            Self::Duration { seconds } => seconds,
            Self::Distance { meters } => meters,
        }
    }
}

/// A discrete locomotion action produced once per gaze trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Unit direction, world space.
    pub direction: Vec3,
    pub bound: MoveBound,
}

impl MoveCommand {
    /// Build a command; `None` when the direction cannot be normalized.
    pub fn new(direction: Vec3, bound: MoveBound) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { direction, bound })
    }
}

/// Progress of the move currently being integrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveMove {
    Timed {
        direction: Vec3,
        duration: f32,
        elapsed: f32,
    },
    ToTarget {
        direction: Vec3,
        target: Vec3,
    },
}

impl ActiveMove {
    pub fn direction(&self) -> Vec3 {
        match *self {
            Self::Timed { direction, .. } | Self::ToTarget { direction, .. } => direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocomotionState {
    #[default]
    Idle,
    Moving(ActiveMove),
}

/// IDLE/MOVING state machine for gaze-triggered moves.
///
/// A move cannot be interrupted: `begin` is rejected until the current
/// move has satisfied its bound.
#[derive(Debug, Clone)]
pub struct LocomotionIntegrator {
    speed: f32,
    state: LocomotionState,
}

impl LocomotionIntegrator {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            state: LocomotionState::Idle,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, LocomotionState::Moving(_))
    }

    /// IDLE → MOVING. Returns false (and changes nothing) while a move is in
    /// progress.
    pub fn begin(&mut self, command: MoveCommand, origin: Vec3) -> bool {
        if self.is_moving() {
            return false;
        }
        let direction = command.direction;
        let active = match command.bound {
            MoveBound::Duration { seconds } => ActiveMove::Timed {
                direction,
                duration: seconds,
                elapsed: 0.0,
            },
            MoveBound::Distance { meters } => ActiveMove::ToTarget {
                direction,
                target: origin + direction * meters,
            },
        };
        tracing::debug!(?direction, bound = ?command.bound, "move started");
        self.state = LocomotionState::Moving(active);
        true
    }

    /// Integrate one frame. Returns the final position when the move
    /// completed on this frame.
    pub fn advance(&mut self, position: &mut Vec3, dt: f32) -> Option<Vec3> {
        let dt = sanitize_dt(dt);
        let LocomotionState::Moving(active) = &mut self.state else {
            return None;
        };

        let done = match active {
            ActiveMove::Timed {
                direction,
                duration,
                elapsed,
            } => {
                // Clamp the last frame to the time that is left.
                let step_time = dt.min((*duration - *elapsed).max(0.0));
                *position += *direction * self.speed * step_time;
                *elapsed += step_time;
                *elapsed + TIME_EPSILON >= *duration
            }
            ActiveMove::ToTarget { direction, target } => {
                let step = self.speed * dt;
                let remaining = *target - *position;
                let reach = step + DISTANCE_EPSILON;
                if remaining.length_squared() <= reach * reach {
                    *position = *target;
                    true
                } else {
                    *position += *direction * step;
                    false
                }
            }
        };

        if done {
            tracing::debug!(position = ?*position, "move completed");
            self.state = LocomotionState::Idle;
            Some(*position)
        } else {
            None
        }
    }
}

/// Negative or non-finite frame deltas count as zero.
pub(crate) fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
