use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::intent::{InputIntent, Intent};

/// Keyboard bindings keyed by `KeyboardEvent.code` (layout independent).
///
/// Directional intents are held: key-down sets the flag, key-up clears it.
/// [`Intent::AutoMove`] is a toggle and only reacts to key-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    bindings: BTreeMap<String, Intent>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let pairs = [
            ("KeyW", Intent::Forward),
            ("ArrowUp", Intent::Forward),
            ("KeyS", Intent::Backward),
            ("ArrowDown", Intent::Backward),
            ("KeyA", Intent::Left),
            ("ArrowLeft", Intent::Left),
            ("KeyD", Intent::Right),
            ("ArrowRight", Intent::Right),
            ("KeyE", Intent::Up),
            ("PageUp", Intent::Up),
            ("KeyQ", Intent::Down),
            ("PageDown", Intent::Down),
            ("KeyR", Intent::AutoMove),
        ];
        Self {
            bindings: pairs
                .into_iter()
                .map(|(code, intent)| (code.to_string(), intent))
                .collect(),
        }
    }
}

impl KeyMap {
    /// A key map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind (or rebind) a key code. Returns the previous binding.
    pub fn bind(&mut self, code: impl Into<String>, intent: Intent) -> Option<Intent> {
        self.bindings.insert(code.into(), intent)
    }

    pub fn unbind(&mut self, code: &str) -> Option<Intent> {
        self.bindings.remove(code)
    }

    pub fn lookup(&self, code: &str) -> Option<Intent> {
        self.bindings.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Apply a key event to the intent record. Returns false for unbound keys.
    pub fn handle_key(&self, code: &str, pressed: bool, input: &mut InputIntent) -> bool {
        let Some(intent) = self.lookup(code) else {
            tracing::trace!(code, "unbound key");
            return false;
        };
        match intent {
            Intent::AutoMove => {
                if pressed {
                    let on = input.toggle_auto_move();
                    tracing::debug!(on, "auto-move toggled");
                }
            }
            _ => input.set(intent, pressed),
        }
        true
    }
}
