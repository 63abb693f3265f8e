use gazewalk_common::Transform;
use serde::{Deserialize, Serialize};

use crate::loader::{AssetId, EnvironmentMap, Model};

/// A model placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInstance {
    pub model: Model,
    pub transform: Transform,
}

/// A change to scene membership, produced by a completed asset load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneMutation {
    /// Replace the environment (lighting + background) map.
    SetEnvironment(EnvironmentMap),
    /// Add a model instance.
    AddModel(ModelInstance),
}

impl SceneMutation {
    /// Content id of the asset this mutation brings into the scene.
    pub fn asset_id(&self) -> AssetId {
        match self {
            Self::SetEnvironment(env) => env.id,
            Self::AddModel(instance) => instance.model.id,
        }
    }
}

/// Scene contents the renderer draws.
///
/// Until a load completes the scene simply lacks that content; an empty
/// scene is a valid state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    environment: Option<EnvironmentMap>,
    models: Vec<ModelInstance>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self) -> Option<&EnvironmentMap> {
        self.environment.as_ref()
    }

    pub fn models(&self) -> &[ModelInstance] {
        &self.models
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.environment.as_ref().is_some_and(|e| e.id == id)
            || self.models.iter().any(|m| m.model.id == id)
    }

    pub fn apply(&mut self, mutation: SceneMutation) {
        match mutation {
            SceneMutation::SetEnvironment(env) => {
                tracing::debug!(id = ?env.id, "environment set");
                self.environment = Some(env);
            }
            SceneMutation::AddModel(instance) => {
                tracing::debug!(id = ?instance.model.id, "model added");
                self.models.push(instance);
            }
        }
    }
}
