//! Render layer identity and version reconciliation
//!
//! Pipeline: a collector (disk walk or farm snapshot) produces names,
//! the [`classifier`] validates them, [`versions`] picks the version per
//! layer and [`sync_state`] compares it with what the scene recorded.

pub mod cache;
pub mod classifier;
pub mod disk;
pub mod emptiness;
pub mod error;
pub mod frames;
pub mod latest;
pub mod scene;
pub mod sync_state;
pub mod tokens;
pub mod types;
pub mod versions;

pub use cache::{CachedDiskCollector, TimedCache, DEFAULT_TTL};
pub use classifier::{classify, collect_layer_keys, LayerTokens};
pub use disk::{collect_all_versions_from, collect_render_layers_from};
pub use error::{LayerError, Result, TokenRejection};
pub use latest::{group_by_role, latest_across, latest_in_groups, versions_of, LayersByRole};
pub use scene::{RecordedLayer, SceneLookup, SceneState};
pub use sync_state::{status_rows, LayerStatus, SyncState};
pub use tokens::TokenConfig;
pub use types::{FrameRange, LayerSource, RenderLayer, VersionToken};
pub use versions::{reduce_all, reduce_last, VersionCandidate};
