//! Session configuration, loadable from YAML.
//!
//! Every field has a default, so an empty document is a valid config that
//! reproduces the stock viewer: 2 s dwell, 2 m/s, 3 s gaze moves.

use gazewalk_assets::AssetRequest;
use gazewalk_input::{GazeBindings, GazeTargets, KeyMap, TouchThresholds};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::locomotion::MoveBound;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gaze and movement tuning shared by the desktop and VR paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Dwell seconds before a gaze trigger fires.
    pub hold_threshold: f32,
    /// Movement speed in units per second, for both paths.
    pub speed: f32,
    /// Bound applied to every gaze-triggered move.
    pub mode: MoveBound,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            hold_threshold: 2.0,
            speed: 2.0,
            mode: MoveBound::default(),
        }
    }
}

/// Where the rig spawns and how gaze directions are corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub spawn_position: Vec3,
    /// Spawn orientation about +Y.
    pub spawn_yaw_degrees: f32,
    /// Extra rotation about +Y applied to gaze directions only.
    pub gaze_yaw_offset_degrees: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 1.6, 3.0),
            spawn_yaw_degrees: 0.0,
            gaze_yaw_offset_degrees: 0.0,
        }
    }
}

/// Everything a session is parameterized by, selected at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub locomotion: LocomotionConfig,
    pub rig: RigConfig,
    pub keys: KeyMap,
    pub touch: TouchThresholds,
    /// Interactive meshes the gaze ray is tested against.
    pub targets: GazeTargets,
    /// Actions for gaze targets; unbound targets locomote.
    pub bindings: GazeBindings,
    /// Directory asset URLs are resolved against.
    pub asset_root: Option<PathBuf>,
    /// Assets requested when a loader is attached.
    pub assets: Vec<AssetRequest>,
}

impl SessionConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "session config loaded");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the gaze timer or integrator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        if !(loco.hold_threshold.is_finite() && loco.hold_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hold_threshold must be positive, got {}",
                loco.hold_threshold
            )));
        }
        if !(loco.speed.is_finite() && loco.speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "speed must be positive, got {}",
                loco.speed
            )));
        }
        let magnitude = loco.mode.magnitude();
        if !(magnitude.is_finite() && magnitude > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "move bound must be positive, got {magnitude}"
            )));
        }
        let rig = &self.rig;
        if !rig.spawn_position.is_finite()
            || !rig.spawn_yaw_degrees.is_finite()
            || !rig.gaze_yaw_offset_degrees.is_finite()
        {
            return Err(ConfigError::Invalid("rig values must be finite".into()));
        }
        Ok(())
    }
}
