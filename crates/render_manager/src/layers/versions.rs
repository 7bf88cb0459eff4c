//! Version selection
//!
//! Orders the version folders of one layer by integer version and picks the
//! latest non-empty one, or every non-empty one for the version picker.

use crate::layers::emptiness::is_empty_version;
use crate::layers::error::LayerError;
use crate::layers::tokens::TokenConfig;
use crate::layers::types::VersionToken;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A version folder discovered for one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub path: PathBuf,
    pub version: VersionToken,
}

impl VersionCandidate {
    pub fn token(&self) -> &str {
        &self.version.token
    }

    pub fn int_version(&self) -> u32 {
        self.version.number
    }
}

/// Names of the sub-directories of `dir`, or `None` when it cannot be read.
pub fn subdirectory_names(dir: &Path) -> Option<Vec<String>> {
    let entries = fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Some(names)
}

/// Version folders among `names`, newest first.
///
/// Ordering is by integer version, ties broken by name (both descending), so
/// `v10000` sorts before `v9999` regardless of padding.
pub fn order_candidates<I, S>(layer_dir: &Path, names: I, tokens: &TokenConfig) -> Vec<VersionCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut candidates: Vec<VersionCandidate> = names
        .into_iter()
        .filter(|name| tokens.is_valid_version_token(name.as_ref()))
        .filter_map(|name| {
            let name = name.as_ref();
            match VersionToken::parse(name) {
                Some(version) => Some(VersionCandidate {
                    path: layer_dir.join(name),
                    version,
                }),
                None => {
                    warn!(version = %name, "Version folder has no version number, skipping");
                    None
                }
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.version
            .number
            .cmp(&a.version.number)
            .then_with(|| b.version.token.cmp(&a.version.token))
    });
    candidates
}

fn non_empty<'a>(
    candidates: Vec<VersionCandidate>,
    extension: &'a str,
) -> impl Iterator<Item = VersionCandidate> + 'a {
    candidates.into_iter().filter(move |candidate| {
        if is_empty_version(&candidate.path, extension) {
            let err = LayerError::EmptyVersion(candidate.path.clone());
            warn!(error = %err, "Skipping empty version");
            false
        } else {
            true
        }
    })
}

/// Latest non-empty version among `names`.
pub fn reduce_last<I, S>(
    layer_dir: &Path,
    names: I,
    tokens: &TokenConfig,
    extension: &str,
) -> Option<VersionCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidates = order_candidates(layer_dir, names, tokens);
    // lazy: stops checking at the first non-empty candidate
    non_empty(candidates, extension).next()
}

/// Every non-empty version among `names`, newest first.
pub fn reduce_all<I, S>(
    layer_dir: &Path,
    names: I,
    tokens: &TokenConfig,
    extension: &str,
) -> Vec<VersionCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidates = order_candidates(layer_dir, names, tokens);
    non_empty(candidates, extension).collect()
}

/// [`reduce_last`] over the folders found in `layer_dir`. `None` when the
/// folder is missing or holds no usable version.
pub fn last_version_in(layer_dir: &Path, tokens: &TokenConfig, extension: &str) -> Option<VersionCandidate> {
    let names = subdirectory_names(layer_dir)?;
    reduce_last(layer_dir, names, tokens, extension)
}

/// [`reduce_all`] over the folders found in `layer_dir`.
pub fn all_versions_in(layer_dir: &Path, tokens: &TokenConfig, extension: &str) -> Vec<VersionCandidate> {
    match subdirectory_names(layer_dir) {
        Some(names) => reduce_all(layer_dir, names, tokens, extension),
        None => Vec::new(),
    }
}
