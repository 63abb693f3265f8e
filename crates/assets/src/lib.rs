//! Asset pipeline: scene graph, content-addressed loading, background queue.
//!
//! Assets are identified by content hashes. Loads run off the frame thread
//! and post [`SceneMutation`]s that the frame tick applies, so the scene is
//! only ever written from one place.
//!
//! # Invariants
//! - A failed load leaves the scene unchanged and is never retried.
//! - Completions are visible only after [`AssetQueue::poll`].

mod loader;
mod queue;
mod scene;

pub use loader::{
    AssetError, AssetId, AssetKind, AssetLoader, AssetRequest, EnvironmentMap, FsLoader,
    LoadedAsset, Model,
};
pub use queue::{AssetCompletion, AssetQueue};
pub use scene::{ModelInstance, Scene, SceneMutation};

pub fn crate_info() -> &'static str {
    "gazewalk-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
