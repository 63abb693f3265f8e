use gazewalk_common::TargetId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of an interactive mesh, in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self::new(center - h, center + h)
    }

    /// Distance along the ray to the first intersection, if any.
    ///
    /// Slab test. `dir` must be normalized; a ray starting inside the box hits
    /// at distance zero.
    pub fn ray_distance(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let inv = dir.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();
        if near.is_nan() || far.is_nan() || far < near.max(0.0) {
            return None;
        }
        Some(near.max(0.0))
    }
}

/// A named interactive box the gaze ray can hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeTarget {
    pub id: TargetId,
    pub bounds: Aabb,
}

/// Fixed set of interactive meshes tested against the gaze ray each frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GazeTargets {
    targets: Vec<GazeTarget>,
}

impl GazeTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<TargetId>, bounds: Aabb) {
        let id = id.into();
        self.targets.retain(|t| t.id != id);
        self.targets.push(GazeTarget { id, bounds });
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GazeTarget> {
        self.targets.iter()
    }

    /// Nearest target hit by the ray, or `None` when the ray misses everything
    /// or the direction is degenerate.
    pub fn pick(&self, origin: Vec3, dir: Vec3) -> Option<&TargetId> {
        if !dir.is_finite() || dir.length_squared() <= 1e-12 {
            return None;
        }
        let dir = dir.normalize();
        self.targets
            .iter()
            .filter_map(|t| t.bounds.ray_distance(origin, dir).map(|d| (d, &t.id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}
