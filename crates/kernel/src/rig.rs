use gazewalk_common::Transform;
use glam::{Quat, Vec3};

use crate::config::RigConfig;

/// The user's rig: the transform the headset (or desktop camera) hangs off.
///
/// Spawn orientation and gaze correction are configured independently;
/// neither is derived from the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserRig {
    transform: Transform,
    gaze_correction: Quat,
}

impl Default for UserRig {
    fn default() -> Self {
        Self::spawn(&RigConfig::default())
    }
}

impl UserRig {
    pub fn spawn(config: &RigConfig) -> Self {
        Self {
            transform: Transform {
                position: config.spawn_position,
                rotation: Quat::from_rotation_y(config.spawn_yaw_degrees.to_radians()),
                scale: Vec3::ONE,
            },
            gaze_correction: Quat::from_rotation_y(config.gaze_yaw_offset_degrees.to_radians()),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.position += delta;
    }

    /// Rig-forward in world space (−Z rotated by the spawn orientation).
    pub fn forward(&self) -> Vec3 {
        self.transform.rotation * Vec3::NEG_Z
    }

    /// World-space eye position for a rig-local head offset.
    pub fn eye_position(&self, head_offset: Vec3) -> Vec3 {
        self.transform.position + self.transform.rotation * head_offset
    }

    /// World-space gaze direction for a rig-local head forward.
    ///
    /// Applies the rig orientation, then the configured gaze correction.
    /// Zero when the head forward is degenerate.
    pub fn gaze_direction(&self, head_forward: Vec3) -> Vec3 {
        (self.gaze_correction * (self.transform.rotation * head_forward)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spawn_matches_config() {
        let rig = UserRig::default();
        assert_eq!(rig.position(), Vec3::new(0.0, 1.6, 3.0));
        assert!((rig.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn spawn_yaw_rotates_gaze() {
        let rig = UserRig::spawn(&RigConfig {
            spawn_yaw_degrees: 270.0,
            ..RigConfig::default()
        });
        // 270° about +Y turns −Z into +X.
        assert!((rig.gaze_direction(Vec3::NEG_Z) - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn gaze_offset_is_independent_of_spawn() {
        let rig = UserRig::spawn(&RigConfig {
            spawn_yaw_degrees: 270.0,
            gaze_yaw_offset_degrees: 90.0,
            ..RigConfig::default()
        });
        // Correction cancels the spawn yaw for gaze, but not the rig forward.
        assert!((rig.gaze_direction(Vec3::NEG_Z) - Vec3::NEG_Z).length() < 1e-5);
        assert!((rig.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn degenerate_head_forward_gives_zero() {
        let rig = UserRig::default();
        assert_eq!(rig.gaze_direction(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn eye_position_follows_rig_rotation() {
        let rig = UserRig::spawn(&RigConfig {
            spawn_position: Vec3::ZERO,
            spawn_yaw_degrees: 90.0,
            ..RigConfig::default()
        });
        let eye = rig.eye_position(Vec3::new(0.0, 0.0, -1.0));
        assert!((eye - Vec3::NEG_X).length() < 1e-5);
    }
}
