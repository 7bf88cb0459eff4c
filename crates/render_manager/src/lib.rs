//! Render Manager - Core Library
//!
//! Tracks the render layers a shot produced, on disk or on the render farm,
//! and reports whether a compositing scene has the latest version loaded.

pub mod config;
pub mod farm;
pub mod layers;

#[cfg(test)]
mod test_support;

pub use config::RenderManagerConfig;
pub use farm::{FarmError, JobsSnapshot, StatusQuery};
pub use layers::{LayerError, RenderLayer, SceneLookup, SyncState, TokenConfig};
