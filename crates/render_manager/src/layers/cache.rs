//! Short-lived result cache for repeated collections

use crate::config::RenderManagerConfig;
use crate::layers::disk::{collect_all_versions_from, collect_render_layers_from};
use crate::layers::tokens::TokenConfig;
use crate::layers::types::RenderLayer;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time a collection result stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Values that expire a fixed time after insertion. No other invalidation.
#[derive(Debug)]
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|(stored, _)| now.saturating_duration_since(*stored) < self.ttl)
            .map(|(_, value)| value)
    }

    /// Store `value`, dropping every entry that has already expired.
    pub fn insert(&mut self, key: K, value: V) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stored, _)| now.saturating_duration_since(*stored) < ttl);
        self.entries.insert(key, (now, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Eq + Hash, V> Default for TimedCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Disk collection results keyed by render root.
#[derive(Debug)]
pub struct CachedDiskCollector {
    tokens: TokenConfig,
    extension: String,
    latest: TimedCache<PathBuf, Vec<RenderLayer>>,
    all_versions: TimedCache<PathBuf, Vec<RenderLayer>>,
}

impl CachedDiskCollector {
    pub fn new(tokens: TokenConfig, extension: impl Into<String>, ttl: Duration) -> Self {
        Self {
            tokens,
            extension: extension.into(),
            latest: TimedCache::new(ttl),
            all_versions: TimedCache::new(ttl),
        }
    }

    /// Collector using the configured tokens, payload extension and TTL.
    pub fn from_config(config: &RenderManagerConfig) -> Self {
        Self::new(
            config.tokens.clone(),
            config.payload_extension.clone(),
            config.cache_ttl(),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.latest.ttl()
    }

    /// Latest layers under `root`, from cache when still fresh.
    pub fn collect(&mut self, root: &Path) -> Vec<RenderLayer> {
        if let Some(layers) = self.latest.get(&root.to_path_buf()) {
            debug!(root = %root.display(), "Using cached render layers");
            return layers.clone();
        }
        self.refresh(root)
    }

    /// Collect `root` again, ignoring and replacing any cached result.
    pub fn refresh(&mut self, root: &Path) -> Vec<RenderLayer> {
        let layers = collect_render_layers_from(root, &self.tokens, &self.extension);
        self.latest.insert(root.to_path_buf(), layers.clone());
        self.all_versions.remove(&root.to_path_buf());
        layers
    }

    /// Every version under `root`, from cache when still fresh.
    pub fn collect_all_versions(&mut self, root: &Path) -> Vec<RenderLayer> {
        let key = root.to_path_buf();
        if let Some(layers) = self.all_versions.get(&key) {
            debug!(root = %root.display(), "Using cached render layer versions");
            return layers.clone();
        }
        let layers = collect_all_versions_from(root, &self.tokens, &self.extension);
        self.all_versions.insert(key, layers.clone());
        layers
    }
}
