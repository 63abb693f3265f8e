//! Rendering adapter: the renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers read the scene and view; they never mutate session state.
//! - The view derives from the rig and head pose reported by the tick.
//!
//! The GPU pipeline lives outside this workspace. A debug text renderer
//! stands in for it so the frame loop can be driven from tests and the CLI.

mod frame_loop;
mod renderer;

pub use frame_loop::{Frame, FrameLoop};
pub use renderer::{DebugTextRenderer, GazeIndicator, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "gazewalk-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
