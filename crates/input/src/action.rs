use gazewalk_common::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::intent::Intent;

/// What a completed gaze dwell on a target means.
///
/// The dwell timer is the same for every target; only the interpretation of
/// its payload differs between locomotion walls and on-screen buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start a gaze-directed move along the current look direction.
    Locomote,
    /// Gaze button: start a bounded move along the intent's rig-local axis.
    Press(Intent),
    /// Flip the auto-move toggle.
    ToggleAutoMove,
    /// Target is interactive but does nothing yet.
    Noop,
}

/// Mapping from gaze targets to actions.
///
/// Unbound targets, and dwelling on nothing at all, default to
/// [`Action::Locomote`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GazeBindings {
    bindings: BTreeMap<TargetId, Action>,
}

impl GazeBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, target: impl Into<TargetId>, action: Action) {
        self.bindings.insert(target.into(), action);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve the action for a trigger payload.
    pub fn resolve(&self, target: Option<&TargetId>) -> Action {
        target
            .and_then(|t| self.bindings.get(t).copied())
            .unwrap_or(Action::Locomote)
    }
}
