use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::intent::{InputIntent, Intent};

/// Drag thresholds, in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchThresholds {
    /// One-finger drag distance on an axis before a planar intent fires.
    pub planar: f32,
    /// Two-finger vertical drag distance before up/down fires.
    pub vertical: f32,
}

impl Default for TouchThresholds {
    fn default() -> Self {
        Self {
            planar: 10.0,
            vertical: 40.0,
        }
    }
}

/// On-screen joystick that turns drag gestures into intents.
///
/// Screen y grows downward, so dragging up means forward (or up with two
/// fingers). Releasing clears only the intents the joystick itself set,
/// keyboard state is left alone.
#[derive(Debug, Clone, Default)]
pub struct TouchJoystick {
    thresholds: TouchThresholds,
    origin: Option<Vec2>,
    fingers: u8,
    owned: Vec<Intent>,
}

impl TouchJoystick {
    pub fn new(thresholds: TouchThresholds) -> Self {
        Self {
            thresholds,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Begin a drag at `position` with `fingers` touch points.
    pub fn start(&mut self, position: Vec2, fingers: u8) {
        self.origin = Some(position);
        self.fingers = fingers.max(1);
    }

    /// Update the drag with the current touch position.
    pub fn drag(&mut self, position: Vec2, input: &mut InputIntent) {
        let Some(origin) = self.origin else {
            return;
        };
        self.release_owned(input);

        let delta = position - origin;
        if self.fingers >= 2 {
            if delta.y < -self.thresholds.vertical {
                self.press(Intent::Up, input);
            } else if delta.y > self.thresholds.vertical {
                self.press(Intent::Down, input);
            }
            return;
        }

        if delta.x < -self.thresholds.planar {
            self.press(Intent::Left, input);
        } else if delta.x > self.thresholds.planar {
            self.press(Intent::Right, input);
        }
        if delta.y < -self.thresholds.planar {
            self.press(Intent::Forward, input);
        } else if delta.y > self.thresholds.planar {
            self.press(Intent::Backward, input);
        }
    }

    /// End the drag and clear the joystick's intents.
    pub fn end(&mut self, input: &mut InputIntent) {
        self.release_owned(input);
        self.origin = None;
        self.fingers = 0;
    }

    /// Intents already held by another source stay owned by that source.
    fn press(&mut self, intent: Intent, input: &mut InputIntent) {
        if input.is_active(intent) {
            return;
        }
        input.set(intent, true);
        self.owned.push(intent);
    }

    fn release_owned(&mut self, input: &mut InputIntent) {
        for intent in self.owned.drain(..) {
            input.set(intent, false);
        }
    }
}
