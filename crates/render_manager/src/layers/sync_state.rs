//! Sync state between the scene and collected layers

use crate::layers::scene::SceneLookup;
use crate::layers::types::RenderLayer;
use serde::Serialize;
use std::fmt;

/// How a scene's loaded version relates to the latest collected one.
///
/// Never stored; recomputed from the two versions on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncState {
    Unloaded = 0,
    Outdated = 1,
    Sync = 2,
}

impl SyncState {
    /// `recorded == 0` is unloaded, `recorded < latest` outdated, else sync.
    pub fn compare(recorded: u32, latest: u32) -> Self {
        if recorded == 0 {
            SyncState::Unloaded
        } else if recorded < latest {
            SyncState::Outdated
        } else {
            SyncState::Sync
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SyncState::Unloaded => "UNLOADED",
            SyncState::Outdated => "OUTDATED",
            SyncState::Sync => "SYNC",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the layer status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerStatus {
    pub layer: String,
    /// Version loaded in the scene, `0` when unloaded.
    pub in_scene: u32,
    /// Latest collected version.
    pub latest: u32,
    /// Frame range recorded in the scene.
    pub range: String,
    /// Frame count recorded in the scene.
    pub frames: String,
    pub aovs: usize,
    pub status: SyncState,
    pub path: String,
}

/// Compare each layer with what `scene` recorded for it.
pub fn status_rows(layers: &[RenderLayer], scene: &dyn SceneLookup) -> Vec<LayerStatus> {
    layers
        .iter()
        .map(|layer| {
            let recorded = scene.recorded(layer.name()).unwrap_or_default();
            LayerStatus {
                layer: layer.name().to_string(),
                in_scene: recorded.version,
                latest: layer.int_version(),
                range: recorded.frame_range,
                frames: recorded.frames,
                aovs: layer.aovs().len(),
                status: SyncState::compare(recorded.version, layer.int_version()),
                path: layer.path().to_string(),
            }
        })
        .collect()
}
