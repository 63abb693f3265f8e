use std::time::Instant;

/// Largest delta a [`SystemClock`] will report. Long stalls (debugger,
/// backgrounded tab) would otherwise turn into one huge locomotion step.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Time information for one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
}

impl FrameTime {
    pub fn new(delta: f32, elapsed: f32) -> Self {
        Self { delta, elapsed }
    }
}

/// Monotonic frame clock collaborator.
pub trait Clock {
    /// Advance to the next frame and return its timing.
    fn tick(&mut self) -> FrameTime;
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = (now - self.last).as_secs_f32().min(MAX_FRAME_DELTA);
        self.last = now;
        FrameTime {
            delta,
            elapsed: (now - self.start).as_secs_f32(),
        }
    }
}

/// Deterministic clock that advances by a constant step every tick.
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    elapsed: f32,
}

impl FixedClock {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> FrameTime {
        self.elapsed += self.step;
        FrameTime {
            delta: self.step,
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_accumulates_elapsed() {
        let mut clock = FixedClock::new(0.5);
        clock.tick();
        clock.tick();
        let t = clock.tick();
        assert_eq!(t.delta, 0.5);
        assert_eq!(t.elapsed, 1.5);
    }

    #[test]
    fn fixed_clock_rejects_negative_step() {
        let mut clock = FixedClock::new(-1.0);
        assert_eq!(clock.tick().delta, 0.0);
    }

    #[test]
    fn system_clock_delta_is_clamped() {
        let mut clock = SystemClock::new();
        let t = clock.tick();
        assert!(t.delta >= 0.0);
        assert!(t.delta <= MAX_FRAME_DELTA);
        assert!(t.elapsed >= 0.0);
    }
}
