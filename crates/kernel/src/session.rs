use gazewalk_assets::{AssetId, AssetLoader, AssetQueue, AssetRequest, Scene};
use gazewalk_common::{FrameTime, TargetId, Transform};
use gazewalk_input::{Action, InputIntent, Intent, TouchJoystick};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, SessionConfig};
use crate::gaze::{GazeTimer, GazeTrigger};
use crate::locomotion::{LocomotionIntegrator, LocomotionState, MoveBound, MoveCommand, sanitize_dt};
use crate::rig::UserRig;
use crate::xr::XrSession;

/// Which movement path ran on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    Desktop,
    Vr,
}

/// A record of something that happened during a tick.
///
/// The log is append-only; drain it to export or inspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    XrStarted {
        frame: u64,
    },
    XrEnded {
        frame: u64,
    },
    GazeTriggered {
        frame: u64,
        target: Option<TargetId>,
        action: Action,
    },
    MoveStarted {
        frame: u64,
        direction: Vec3,
        bound: MoveBound,
    },
    MoveCompleted {
        frame: u64,
        position: Vec3,
    },
    MoveIgnored {
        frame: u64,
        reason: String,
    },
    AutoMoveToggled {
        frame: u64,
        on: bool,
    },
    AssetLoaded {
        frame: u64,
        url: String,
        id: AssetId,
    },
    AssetFailed {
        frame: u64,
        url: String,
        error: String,
    },
}

/// What a tick produced, for the renderer and instrumentation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub time: FrameTime,
    pub mode: PathMode,
    pub rig: Transform,
    /// World-space eye position for this frame's view.
    pub eye: Vec3,
    /// World-space view direction.
    pub look: Vec3,
    /// Target under the gaze ray (VR path only).
    pub gaze_target: Option<TargetId>,
    /// Gaze-progress indicator scale, `min(timer / threshold, 1)`.
    pub gaze_progress: f32,
    pub trigger: Option<GazeTrigger>,
    pub moving: bool,
}

/// One viewing session: rig, input, gaze, locomotion and scene.
///
/// All state is mutated from [`Session::tick`] and the input handlers, on a
/// single thread. Background asset loads only post completions; they are
/// applied at the start of the next tick.
pub struct Session {
    config: SessionConfig,
    rig: UserRig,
    input: InputIntent,
    joystick: TouchJoystick,
    gaze: GazeTimer,
    locomotion: LocomotionIntegrator,
    scene: Scene,
    assets: Option<AssetQueue>,
    xr_active: bool,
    frame: u64,
    event_log: Vec<SessionEvent>,
}

impl Session {
    /// Create a session at the configured spawn point.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let loco = config.locomotion;
        Ok(Self {
            rig: UserRig::spawn(&config.rig),
            input: InputIntent::new(),
            joystick: TouchJoystick::new(config.touch),
            gaze: GazeTimer::new(loco.hold_threshold),
            locomotion: LocomotionIntegrator::new(loco.speed),
            scene: Scene::new(),
            assets: None,
            xr_active: false,
            frame: 0,
            event_log: Vec::new(),
            config,
        })
    }

    /// Attach an asset loader and request every asset listed in the config.
    pub fn attach_loader(&mut self, loader: Arc<dyn AssetLoader>) {
        let mut queue = AssetQueue::new(loader);
        for request in &self.config.assets {
            queue.request(request.clone());
        }
        self.assets = Some(queue);
    }

    /// Request one more asset. Returns false if no loader is attached.
    pub fn request_asset(&mut self, request: AssetRequest) -> bool {
        match &mut self.assets {
            Some(queue) => {
                queue.request(request);
                true
            }
            None => {
                tracing::warn!(url = %request.url, "no asset loader attached, request dropped");
                false
            }
        }
    }

    /// Number of asset loads not yet applied to the scene.
    pub fn pending_assets(&self) -> usize {
        self.assets.as_ref().map_or(0, AssetQueue::in_flight)
    }

    /// Block until outstanding loads finish (or `timeout`), then apply them.
    pub fn settle_assets(&mut self, timeout: Duration) {
        let Some(queue) = &mut self.assets else {
            return;
        };
        let done = queue.wait_idle(timeout);
        for completion in done {
            self.apply_completion(completion);
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rig(&self) -> &UserRig {
        &self.rig
    }

    pub fn input(&self) -> &InputIntent {
        &self.input
    }

    pub fn gaze(&self) -> &GazeTimer {
        &self.gaze
    }

    pub fn locomotion(&self) -> &LocomotionState {
        self.locomotion.state()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_xr_active(&self) -> bool {
        self.xr_active
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Keyboard event by `KeyboardEvent.code`. Returns false for unbound keys.
    pub fn key(&mut self, code: &str, pressed: bool) -> bool {
        let was_auto = self.input.auto_move;
        let handled = self.config.keys.handle_key(code, pressed, &mut self.input);
        if self.input.auto_move != was_auto {
            self.event_log.push(SessionEvent::AutoMoveToggled {
                frame: self.frame,
                on: self.input.auto_move,
            });
        }
        handled
    }

    pub fn set_intent(&mut self, intent: Intent, active: bool) {
        self.input.set(intent, active);
    }

    /// Release every held intent (window blur, session switch).
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    pub fn touch_start(&mut self, position: Vec2, fingers: u8) {
        self.joystick.start(position, fingers);
    }

    pub fn touch_move(&mut self, position: Vec2) {
        self.joystick.drag(position, &mut self.input);
    }

    pub fn touch_end(&mut self) {
        self.joystick.end(&mut self.input);
    }

    /// Advance one frame.
    pub fn tick(&mut self, time: FrameTime, xr: &dyn XrSession) -> FrameReport {
        self.frame += 1;
        let _span = tracing::info_span!("session_tick", frame = self.frame).entered();
        let dt = sanitize_dt(time.delta);

        self.apply_pending_assets();

        let presenting = xr.is_presenting();
        if presenting != self.xr_active {
            self.xr_active = presenting;
            self.gaze.clear();
            let event = if presenting {
                tracing::info!("XR session started");
                SessionEvent::XrStarted { frame: self.frame }
            } else {
                tracing::info!("XR session ended");
                SessionEvent::XrEnded { frame: self.frame }
            };
            self.event_log.push(event);
        }

        if presenting {
            self.tick_vr(time, dt, xr)
        } else {
            self.tick_desktop(time, dt)
        }
    }

    fn tick_vr(&mut self, time: FrameTime, dt: f32, xr: &dyn XrSession) -> FrameReport {
        let pose = xr.head_pose();
        let look = self.rig.gaze_direction(pose.forward);
        let eye = self.rig.eye_position(pose.offset);
        let gaze_target = self.config.targets.pick(eye, look).cloned();

        // Finish (or continue) the move in flight before looking for a new one.
        let was_moving = self.advance_move(dt);
        if !was_moving && self.input.auto_move {
            self.rig.translate(look * self.config.locomotion.speed * dt);
        }

        // Dwell does not accumulate while a move is in flight.
        let gaze_dt = if self.locomotion.is_moving() { 0.0 } else { dt };
        let trigger = self.gaze.update(gaze_dt, gaze_target.as_ref());
        if let Some(trigger) = &trigger {
            self.on_trigger(trigger, look);
        }

        FrameReport {
            frame: self.frame,
            time,
            mode: PathMode::Vr,
            rig: *self.rig.transform(),
            eye: self.rig.eye_position(pose.offset),
            look,
            gaze_target,
            gaze_progress: self.gaze.progress(),
            trigger,
            moving: self.locomotion.is_moving(),
        }
    }

    fn tick_desktop(&mut self, time: FrameTime, dt: f32) -> FrameReport {
        // A gaze move started in VR still runs to its bound after XR ends.
        self.advance_move(dt);

        let speed = self.config.locomotion.speed;
        let step = if self.input.auto_move && !self.input.any_directional() {
            self.rig.forward() * speed * dt
        } else {
            self.rig.transform().rotation * self.input.velocity(speed, dt)
        };
        self.rig.translate(step);

        FrameReport {
            frame: self.frame,
            time,
            mode: PathMode::Desktop,
            rig: *self.rig.transform(),
            eye: self.rig.position(),
            look: self.rig.forward(),
            gaze_target: None,
            gaze_progress: 0.0,
            trigger: None,
            moving: self.locomotion.is_moving(),
        }
    }

    /// Integrate the move in flight, if any. Returns whether one was in
    /// flight at the start of the frame.
    fn advance_move(&mut self, dt: f32) -> bool {
        let was_moving = self.locomotion.is_moving();
        let mut position = self.rig.position();
        if let Some(end) = self.locomotion.advance(&mut position, dt) {
            self.event_log.push(SessionEvent::MoveCompleted {
                frame: self.frame,
                position: end,
            });
            self.gaze.reset();
        }
        self.rig.set_position(position);
        was_moving
    }

    fn on_trigger(&mut self, trigger: &GazeTrigger, look: Vec3) {
        let action = self.config.bindings.resolve(trigger.target.as_ref());
        self.event_log.push(SessionEvent::GazeTriggered {
            frame: self.frame,
            target: trigger.target.clone(),
            action,
        });

        match action {
            Action::Locomote => self.start_move(look),
            Action::Press(Intent::AutoMove) | Action::ToggleAutoMove => {
                let on = self.input.toggle_auto_move();
                self.event_log.push(SessionEvent::AutoMoveToggled {
                    frame: self.frame,
                    on,
                });
            }
            Action::Press(intent) => {
                // Button axes are rig-local, like the desktop keys.
                let direction = self.rig.transform().rotation * intent.axis();
                self.start_move(direction);
            }
            Action::Noop => {}
        }
    }

    fn start_move(&mut self, direction: Vec3) {
        let bound = self.config.locomotion.mode;
        let Some(command) = MoveCommand::new(direction, bound) else {
            self.ignore_move("degenerate direction");
            return;
        };
        if !self.locomotion.begin(command, self.rig.position()) {
            self.ignore_move("move already in progress");
            return;
        }
        self.event_log.push(SessionEvent::MoveStarted {
            frame: self.frame,
            direction: command.direction,
            bound,
        });
    }

    fn ignore_move(&mut self, reason: &str) {
        tracing::debug!(reason, "gaze move ignored");
        self.event_log.push(SessionEvent::MoveIgnored {
            frame: self.frame,
            reason: reason.to_string(),
        });
    }

    fn apply_pending_assets(&mut self) {
        let Some(queue) = &mut self.assets else {
            return;
        };
        for completion in queue.poll() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: gazewalk_assets::AssetCompletion) {
        let url = completion.request.url;
        match completion.result {
            Ok(mutation) => {
                let id = mutation.asset_id();
                tracing::info!(%url, ?id, "asset loaded");
                self.scene.apply(mutation);
                self.event_log.push(SessionEvent::AssetLoaded {
                    frame: self.frame,
                    url,
                    id,
                });
            }
            Err(e) => {
                tracing::error!(%url, "asset load failed: {e}");
                self.event_log.push(SessionEvent::AssetFailed {
                    frame: self.frame,
                    url,
                    error: e.to_string(),
                });
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frame", &self.frame)
            .field("rig", &self.rig)
            .field("xr_active", &self.xr_active)
            .field("locomotion", self.locomotion.state())
            .finish_non_exhaustive()
    }
}
