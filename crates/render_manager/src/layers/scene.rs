//! Scene-recorded layer state
//!
//! The compositing scene remembers, per layer, which version it loaded and
//! with which frame range. Collectors never talk to the scene: callers hand
//! in a [`SceneLookup`].

use crate::layers::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// What the scene recorded for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedLayer {
    /// Loaded version, `0` when the layer was never loaded.
    pub version: u32,
    pub frame_range: String,
    pub frames: String,
    /// Versions of referenced sub-assets (alembic caches and similar).
    pub refs: Vec<String>,
}

impl Default for RecordedLayer {
    fn default() -> Self {
        Self {
            version: 0,
            frame_range: "0".to_string(),
            frames: "0".to_string(),
            refs: Vec::new(),
        }
    }
}

/// Read-only access to the values recorded in the scene, keyed by layer name.
pub trait SceneLookup {
    fn recorded(&self, layer_name: &str) -> Option<RecordedLayer>;
}

impl SceneLookup for HashMap<String, RecordedLayer> {
    fn recorded(&self, layer_name: &str) -> Option<RecordedLayer> {
        self.get(layer_name).cloned()
    }
}

impl SceneLookup for BTreeMap<String, RecordedLayer> {
    fn recorded(&self, layer_name: &str) -> Option<RecordedLayer> {
        self.get(layer_name).cloned()
    }
}

/// Scene state exported to JSON, for comparisons outside the host application.
///
/// ```json
/// {"layers": {"RND_BG_TECH": {"version": 24, "frame_range": "1001-1020"}}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneState {
    pub layers: BTreeMap<String, RecordedLayer>,
}

impl SceneState {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SceneLookup for SceneState {
    fn recorded(&self, layer_name: &str) -> Option<RecordedLayer> {
        self.layers.recorded(layer_name)
    }
}
