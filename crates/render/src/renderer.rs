use std::fmt::Write;

use gazewalk_assets::Scene;
use gazewalk_kernel::{FrameReport, PathMode};
use glam::Vec3;

/// Camera configuration for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.6, 3.0),
            forward: Vec3::NEG_Z,
            fov_degrees: 75.0,
        }
    }
}

impl RenderView {
    pub fn from_report(report: &FrameReport) -> Self {
        Self {
            eye: report.eye,
            forward: report.look,
            ..Self::default()
        }
    }
}

/// Gaze-progress ring drawn in front of the eye while in VR.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeIndicator {
    pub visible: bool,
    /// Fill in `[0, 1]`.
    pub progress: f32,
}

impl GazeIndicator {
    pub fn from_report(report: &FrameReport) -> Self {
        Self {
            visible: report.mode == PathMode::Vr,
            progress: report.gaze_progress.clamp(0.0, 1.0),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene, the view and the gaze indicator, then
/// produces output. Scene truth is owned by the session.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene, view: &RenderView, indicator: &GazeIndicator) -> Self::Output;
}

/// Human-readable frame dump for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView, indicator: &GazeIndicator) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "eye=({:.2}, {:.2}, {:.2}) look=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.forward.x,
            view.forward.y,
            view.forward.z,
            view.fov_degrees
        );
        match scene.environment() {
            Some(env) => {
                let _ = writeln!(out, "environment: {} ({}x{})", env.source, env.width, env.height);
            }
            None => {
                let _ = writeln!(out, "environment: none");
            }
        }
        let _ = writeln!(out, "models: {}", scene.model_count());
        for instance in scene.models() {
            let p = instance.transform.position;
            let _ = writeln!(
                out,
                "  {} meshes={} pos=({:.2}, {:.2}, {:.2})",
                instance.model.source,
                instance.model.meshes.len(),
                p.x,
                p.y,
                p.z
            );
        }
        if indicator.visible {
            let _ = writeln!(out, "gaze: {:>3.0}%", indicator.progress * 100.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazewalk_assets::{AssetId, EnvironmentMap, Model, ModelInstance, SceneMutation};
    use gazewalk_common::Transform;

    #[test]
    fn empty_scene() {
        let output = DebugTextRenderer::new().render(
            &Scene::new(),
            &RenderView::default(),
            &GazeIndicator::default(),
        );
        assert!(output.contains("environment: none"));
        assert!(output.contains("models: 0"));
        assert!(!output.contains("gaze:"));
    }

    #[test]
    fn scene_with_environment_and_model() {
        let mut scene = Scene::new();
        scene.apply(SceneMutation::SetEnvironment(EnvironmentMap {
            id: AssetId(1),
            source: "env.hdr".into(),
            width: 64,
            height: 32,
        }));
        scene.apply(SceneMutation::AddModel(ModelInstance {
            model: Model {
                id: AssetId(2),
                source: "scene-optimized.glb".into(),
                meshes: vec!["floor".into(), "walls".into()],
            },
            transform: Transform::from_position(Vec3::new(0.0, -13.0, 0.0)),
        }));

        let indicator = GazeIndicator {
            visible: true,
            progress: 0.5,
        };
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default(), &indicator);
        assert!(output.contains("environment: env.hdr (64x32)"));
        assert!(output.contains("scene-optimized.glb meshes=2 pos=(0.00, -13.00, 0.00)"));
        assert!(output.contains("gaze:  50%"));
    }

    #[test]
    fn render_view_default_matches_spawn() {
        let view = RenderView::default();
        assert_eq!(view.eye, Vec3::new(0.0, 1.6, 3.0));
        assert_eq!(view.forward, Vec3::NEG_Z);
    }
}
