use gazewalk_common::TargetId;
use gazewalk_input::Intent;
use gazewalk_kernel::{LocomotionState, Session, SessionEvent};
use glam::Vec3;

/// Read-only queries against a session for debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    pub fn summary(session: &Session) -> SessionSummary {
        let events = session.events();
        let count = |pred: fn(&SessionEvent) -> bool| events.iter().filter(|e| pred(e)).count();
        SessionSummary {
            frame: session.frame(),
            xr_active: session.is_xr_active(),
            position: session.rig().position(),
            moving: matches!(session.locomotion(), LocomotionState::Moving(_)),
            auto_move: session.input().auto_move,
            held: Intent::DIRECTIONAL
                .into_iter()
                .filter(|i| session.input().is_active(*i))
                .collect(),
            gaze_target: session.gaze().target().cloned(),
            gaze_progress: session.gaze().progress(),
            triggers: count(|e| matches!(e, SessionEvent::GazeTriggered { .. })),
            moves_completed: count(|e| matches!(e, SessionEvent::MoveCompleted { .. })),
            assets_loaded: count(|e| matches!(e, SessionEvent::AssetLoaded { .. })),
            assets_failed: count(|e| matches!(e, SessionEvent::AssetFailed { .. })),
            pending_assets: session.pending_assets(),
        }
    }

    pub fn rig(session: &Session) -> RigInfo {
        let t = session.rig().transform();
        RigInfo {
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            forward: session.rig().forward().to_array(),
        }
    }
}

/// Snapshot of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub frame: u64,
    pub xr_active: bool,
    pub position: Vec3,
    pub moving: bool,
    pub auto_move: bool,
    pub held: Vec<Intent>,
    pub gaze_target: Option<TargetId>,
    pub gaze_progress: f32,
    pub triggers: usize,
    pub moves_completed: usize,
    pub assets_loaded: usize,
    pub assets_failed: usize,
    pub pending_assets: usize,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.xr_active { "vr" } else { "desktop" };
        let state = if self.moving { "moving" } else { "idle" };
        let target = self.gaze_target.as_ref().map_or("none", TargetId::as_str);
        writeln!(
            f,
            "Session: frame={} mode={mode} state={state} auto_move={}",
            self.frame, self.auto_move
        )?;
        writeln!(
            f,
            "  rig: pos=({:.3}, {:.3}, {:.3}) held={:?}",
            self.position.x, self.position.y, self.position.z, self.held
        )?;
        writeln!(
            f,
            "  gaze: target={target} progress={:.2} triggers={} moves={}",
            self.gaze_progress, self.triggers, self.moves_completed
        )?;
        write!(
            f,
            "  assets: loaded={} failed={} pending={}",
            self.assets_loaded, self.assets_failed, self.pending_assets
        )
    }
}

/// Rig transform as plain arrays.
#[derive(Debug, Clone)]
pub struct RigInfo {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub forward: [f32; 3],
}

impl std::fmt::Display for RigInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rig pos=({:.2}, {:.2}, {:.2}) forward=({:.2}, {:.2}, {:.2})",
            self.position[0],
            self.position[1],
            self.position[2],
            self.forward[0],
            self.forward[1],
            self.forward[2],
        )
    }
}
