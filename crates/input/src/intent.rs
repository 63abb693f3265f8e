use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A named movement intent. Every input device (keyboard, touch joystick,
/// gaze buttons) produces these; the session never sees raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    AutoMove,
}

impl Intent {
    /// The six directional intents, in axis order.
    pub const DIRECTIONAL: [Intent; 6] = [
        Intent::Forward,
        Intent::Backward,
        Intent::Left,
        Intent::Right,
        Intent::Up,
        Intent::Down,
    ];

    /// Unit contribution of this intent in rig-local space. Forward is −Z.
    pub fn axis(self) -> Vec3 {
        match self {
            Intent::Forward => Vec3::NEG_Z,
            Intent::Backward => Vec3::Z,
            Intent::Left => Vec3::NEG_X,
            Intent::Right => Vec3::X,
            Intent::Up => Vec3::Y,
            Intent::Down => Vec3::NEG_Y,
            Intent::AutoMove => Vec3::ZERO,
        }
    }

    pub fn is_directional(self) -> bool {
        !matches!(self, Intent::AutoMove)
    }
}

/// Current boolean intents of the user.
///
/// Owned by the session and mutated by input collaborators; read once per
/// frame by the desktop movement path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub auto_move: bool,
}

impl InputIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one named flag.
    pub fn set(&mut self, intent: Intent, active: bool) {
        *self.flag_mut(intent) = active;
    }

    pub fn is_active(&self, intent: Intent) -> bool {
        match intent {
            Intent::Forward => self.forward,
            Intent::Backward => self.backward,
            Intent::Left => self.left,
            Intent::Right => self.right,
            Intent::Up => self.up,
            Intent::Down => self.down,
            Intent::AutoMove => self.auto_move,
        }
    }

    /// Flip the auto-move toggle and return its new value.
    pub fn toggle_auto_move(&mut self) -> bool {
        self.auto_move = !self.auto_move;
        self.auto_move
    }

    /// True if any of the six directional flags is set.
    pub fn any_directional(&self) -> bool {
        Intent::DIRECTIONAL.iter().any(|i| self.is_active(*i))
    }

    /// Release every flag, including auto-move.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Velocity step for this frame.
    ///
    /// Sums the unit axes of the active directional flags, normalizes the
    /// result and scales it by `speed * dt`. Returns zero when nothing is
    /// active or opposing flags cancel out.
    pub fn velocity(&self, speed: f32, dt: f32) -> Vec3 {
        let sum: Vec3 = Intent::DIRECTIONAL
            .iter()
            .filter(|i| self.is_active(**i))
            .map(|i| i.axis())
            .sum();
        sum.normalize_or_zero() * speed * dt
    }

    fn flag_mut(&mut self, intent: Intent) -> &mut bool {
        match intent {
            Intent::Forward => &mut self.forward,
            Intent::Backward => &mut self.backward,
            Intent::Left => &mut self.left,
            Intent::Right => &mut self.right,
            Intent::Up => &mut self.up,
            Intent::Down => &mut self.down,
            Intent::AutoMove => &mut self.auto_move,
        }
    }
}
