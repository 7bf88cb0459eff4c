//! Disk collector
//!
//! Walks a shot's render root, e.g.
//!
//! ```text
//! <root>/RND_BG_TECH/LGT_KAF_010_v0026/N/RND_BG_TECH_N_1001.exr
//! ```
//!
//! and turns every valid layer folder into [`RenderLayer`] values.

use crate::layers::classifier::{classify, collect_layer_keys, layer_names_for_key, LayerTokens};
use crate::layers::error::LayerError;
use crate::layers::frames::scan_frames;
use crate::layers::tokens::TokenConfig;
use crate::layers::types::{LayerSource, RenderLayer};
use crate::layers::versions::{all_versions_in, last_version_in, subdirectory_names, VersionCandidate};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A classified layer folder under the render root.
#[derive(Debug, Clone)]
struct LayerDir {
    name: String,
    tokens: LayerTokens,
    path: PathBuf,
}

/// Layer folders under `root`, grouped by key and ordered by pass precedence.
fn layer_dirs(root: &Path, tokens: &TokenConfig) -> Vec<LayerDir> {
    let names = match subdirectory_names(root) {
        Some(names) => names,
        None => {
            let err = LayerError::InvalidPath(root.to_path_buf());
            warn!(error = %err, "Render root not readable");
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    for key in collect_layer_keys(&names, tokens) {
        for name in layer_names_for_key(&key, tokens) {
            if !names.contains(&name) {
                continue;
            }
            if let Ok(layer_tokens) = classify(&name, tokens) {
                dirs.push(LayerDir {
                    path: root.join(&name),
                    name,
                    tokens: layer_tokens,
                });
            }
        }
    }
    dirs
}

fn build_layer(dir: &LayerDir, candidate: VersionCandidate, tokens: &TokenConfig, extension: &str) -> RenderLayer {
    let aov_names = subdirectory_names(&candidate.path).unwrap_or_default();
    let aovs = tokens.filter_aovs(&dir.tokens.pass, aov_names);
    let frames = aovs
        .first()
        .and_then(|aov| scan_frames(&candidate.path.join(aov), extension));

    debug!(layer = %dir.name, version = %candidate.token(), aovs = aovs.len(), "Collected render layer");

    RenderLayer::new(
        dir.name.clone(),
        dir.tokens.clone(),
        candidate.version,
        &candidate.path.to_string_lossy(),
        LayerSource::Disk,
    )
    .with_aovs(aovs)
    .with_frames(frames.map(|info| info.range()))
}

/// Latest non-empty version of every layer under `root`.
///
/// A missing root or a layer without a usable version is logged and left
/// out; this never fails.
pub fn collect_render_layers_from(root: &Path, tokens: &TokenConfig, extension: &str) -> Vec<RenderLayer> {
    let mut layers = Vec::new();
    for dir in layer_dirs(root, tokens) {
        match last_version_in(&dir.path, tokens, extension) {
            Some(candidate) => layers.push(build_layer(&dir, candidate, tokens, extension)),
            None => {
                let err = LayerError::NoVersionFound(dir.path.clone());
                warn!(error = %err, "Discarding invalid path");
            }
        }
    }
    info!(root = %root.display(), layers = layers.len(), "Collected render layers from disk");
    layers
}

/// Every non-empty version of every layer under `root`, newest first per layer.
pub fn collect_all_versions_from(root: &Path, tokens: &TokenConfig, extension: &str) -> Vec<RenderLayer> {
    let mut layers = Vec::new();
    for dir in layer_dirs(root, tokens) {
        let candidates = all_versions_in(&dir.path, tokens, extension);
        if candidates.is_empty() {
            let err = LayerError::NoVersionFound(dir.path.clone());
            warn!(error = %err, "Discarding invalid path");
            continue;
        }
        layers.extend(
            candidates
                .into_iter()
                .map(|candidate| build_layer(&dir, candidate, tokens, extension)),
        );
    }
    info!(root = %root.display(), layers = layers.len(), "Collected all render layer versions from disk");
    layers
}
