use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Head pose reported by the XR runtime, in rig-local tracking space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Eye position relative to the rig origin.
    pub offset: Vec3,
    /// Look direction. Need not be normalized.
    pub forward: Vec3,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }
}

impl HeadPose {
    /// Pose looking along yaw (about +Y, positive turns left) and pitch
    /// (positive looks up), both in degrees.
    pub fn from_yaw_pitch(yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let rotation = Quat::from_rotation_y(yaw_degrees.to_radians())
            * Quat::from_rotation_x(pitch_degrees.to_radians());
        Self {
            offset: Vec3::ZERO,
            forward: rotation * Vec3::NEG_Z,
        }
    }
}

/// XR session collaborator consulted once per frame.
pub trait XrSession {
    /// True while an immersive session is presenting.
    fn is_presenting(&self) -> bool;
    /// Current head pose. Only meaningful while presenting.
    fn head_pose(&self) -> HeadPose;
}

/// Desktop-only runtime: never presents.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoXr;

impl XrSession for NoXr {
    fn is_presenting(&self) -> bool {
        false
    }

    fn head_pose(&self) -> HeadPose {
        HeadPose::default()
    }
}

/// Scriptable XR runtime for the CLI and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedXr {
    pub presenting: bool,
    pub pose: HeadPose,
}

impl SimulatedXr {
    pub fn presenting() -> Self {
        Self {
            presenting: true,
            pose: HeadPose::default(),
        }
    }

    pub fn start(&mut self) {
        self.presenting = true;
    }

    pub fn end(&mut self) {
        self.presenting = false;
    }

    pub fn look(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        let offset = self.pose.offset;
        self.pose = HeadPose::from_yaw_pitch(yaw_degrees, pitch_degrees);
        self.pose.offset = offset;
    }
}

impl XrSession for SimulatedXr {
    fn is_presenting(&self) -> bool {
        self.presenting
    }

    fn head_pose(&self) -> HeadPose {
        self.pose
    }
}
