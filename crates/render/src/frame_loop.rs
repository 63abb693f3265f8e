use gazewalk_common::Clock;
use gazewalk_kernel::{FrameReport, Session, XrSession};

use crate::renderer::{GazeIndicator, RenderView, Renderer};

/// One rendered frame and the tick report it was drawn from.
#[derive(Debug, Clone)]
pub struct Frame<T> {
    pub report: FrameReport,
    pub output: T,
}

/// Drives clock → session tick → renderer, once per display refresh.
#[derive(Debug)]
pub struct FrameLoop<C, R> {
    clock: C,
    renderer: R,
}

impl<C: Clock, R: Renderer> FrameLoop<C, R> {
    pub fn new(clock: C, renderer: R) -> Self {
        Self { clock, renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn run_frame(&mut self, session: &mut Session, xr: &dyn XrSession) -> Frame<R::Output> {
        let time = self.clock.tick();
        let report = session.tick(time, xr);
        let view = RenderView::from_report(&report);
        let indicator = GazeIndicator::from_report(&report);
        tracing::trace!(frame = report.frame, progress = indicator.progress, "render");
        let output = self.renderer.render(session.scene(), &view, &indicator);
        Frame { report, output }
    }

    /// Run `frames` frames and return the last one.
    pub fn run(
        &mut self,
        session: &mut Session,
        xr: &dyn XrSession,
        frames: usize,
    ) -> Option<Frame<R::Output>> {
        let mut last = None;
        for _ in 0..frames {
            last = Some(self.run_frame(session, xr));
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DebugTextRenderer;
    use gazewalk_common::FixedClock;
    use gazewalk_kernel::{NoXr, SessionConfig, SimulatedXr};

    #[test]
    fn desktop_frame_has_no_indicator() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut frames = FrameLoop::new(FixedClock::new(0.5), DebugTextRenderer::new());
        session.key("KeyW", true);
        let frame = frames.run_frame(&mut session, &NoXr);
        assert_eq!(frame.report.frame, 1);
        assert!(frame.output.contains("eye=(0.00, 1.60, 2.00)"));
        assert!(!frame.output.contains("gaze:"));
    }

    #[test]
    fn vr_frames_show_dwell_progress() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut frames = FrameLoop::new(FixedClock::new(0.5), DebugTextRenderer::new());
        let xr = SimulatedXr::presenting();
        let frame = frames.run(&mut session, &xr, 2).unwrap();
        assert_eq!(frame.report.gaze_progress, 0.5);
        assert!(frame.output.contains("gaze:  50%"));
    }

    #[test]
    fn zero_frames_yield_nothing() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut frames = FrameLoop::new(FixedClock::new(0.5), DebugTextRenderer::new());
        assert!(frames.run(&mut session, &NoXr, 0).is_none());
        assert_eq!(session.frame(), 0);
    }
}
