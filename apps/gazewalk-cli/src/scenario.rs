//! Scripted sessions: a session config plus per-tick input steps.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use gazewalk_assets::AssetRequest;
use gazewalk_common::FixedClock;
use gazewalk_kernel::{Session, SessionConfig, SimulatedXr};
use gazewalk_render::{DebugTextRenderer, FrameLoop};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioAction {
    KeyDown(String),
    KeyUp(String),
    Look { yaw: f32, pitch: f32 },
    XrStart,
    XrEnd,
    TouchStart { x: f32, y: f32, fingers: u8 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
    Request(AssetRequest),
}

/// Actions applied right before tick `at` (zero based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub at: u64,
    pub actions: Vec<ScenarioAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub session: SessionConfig,
    /// Fixed frame delta in seconds.
    pub dt: f32,
    pub ticks: u64,
    /// Wait for requested assets before the next tick, so runs are repeatable.
    pub settle_assets: bool,
    pub steps: Vec<Step>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            dt: 0.1,
            ticks: 60,
            settle_assets: true,
            steps: Vec::new(),
        }
    }
}

const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

impl Scenario {
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_yaml::from_str(text).context("parsing scenario YAML")?;
        scenario.session.validate()?;
        anyhow::ensure!(
            scenario.dt.is_finite() && scenario.dt >= 0.0,
            "dt must be a non-negative number, got {}",
            scenario.dt
        );
        Ok(scenario)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("loading scenario {}", path.display()))
    }

    /// Run every tick, returning the rendered frames when `render` is set.
    pub fn run(&self, session: &mut Session, render: bool) -> Vec<String> {
        let mut xr = SimulatedXr::default();
        let mut frames = FrameLoop::new(FixedClock::new(self.dt), DebugTextRenderer::new());
        let mut rendered = Vec::new();

        if self.settle_assets {
            session.settle_assets(SETTLE_TIMEOUT);
        }
        for tick in 0..self.ticks {
            for step in self.steps.iter().filter(|s| s.at == tick) {
                for action in &step.actions {
                    apply(action, session, &mut xr);
                }
            }
            if self.settle_assets && session.pending_assets() > 0 {
                session.settle_assets(SETTLE_TIMEOUT);
            }
            let frame = frames.run_frame(session, &xr);
            if render {
                rendered.push(format!("--- frame {} ---\n{}", frame.report.frame, frame.output));
            }
        }
        rendered
    }
}

fn apply(action: &ScenarioAction, session: &mut Session, xr: &mut SimulatedXr) {
    tracing::debug!(?action, frame = session.frame(), "scenario action");
    match action {
        ScenarioAction::KeyDown(code) => {
            if !session.key(code, true) {
                tracing::warn!(%code, "unbound key");
            }
        }
        ScenarioAction::KeyUp(code) => {
            session.key(code, false);
        }
        ScenarioAction::Look { yaw, pitch } => xr.look(*yaw, *pitch),
        ScenarioAction::XrStart => xr.start(),
        ScenarioAction::XrEnd => xr.end(),
        ScenarioAction::TouchStart { x, y, fingers } => {
            session.touch_start(Vec2::new(*x, *y), *fingers)
        }
        ScenarioAction::TouchMove { x, y } => session.touch_move(Vec2::new(*x, *y)),
        ScenarioAction::TouchEnd => session.touch_end(),
        ScenarioAction::Request(request) => {
            session.request_asset(request.clone());
        }
    }
}
