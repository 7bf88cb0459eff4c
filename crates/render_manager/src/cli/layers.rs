//! Layers command - status of the render layers found on disk

use crate::cli::config::load_config;
use crate::cli::error::HelpfulError;
use crate::cli::output::print_status_table;
use render_manager::config::expand_home;
use render_manager::layers::{status_rows, CachedDiskCollector, LayerStatus, SceneState, SyncState};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the layers command
#[derive(Debug)]
pub struct LayersArgs {
    pub root: PathBuf,
    pub scene: Option<PathBuf>,
    pub all_versions: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct LayersOutput {
    root: String,
    all_versions: bool,
    summary: StatusSummary,
    layers: Vec<LayerStatus>,
}

/// Row counts per sync state.
#[derive(Debug, Default, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub unloaded: usize,
    pub outdated: usize,
    pub sync: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[LayerStatus]) -> Self {
        let count = |state: SyncState| rows.iter().filter(|r| r.status == state).count();
        Self {
            total: rows.len(),
            unloaded: count(SyncState::Unloaded),
            outdated: count(SyncState::Outdated),
            sync: count(SyncState::Sync),
        }
    }
}

/// Load `--scene`, or an empty scene when none was given.
pub fn load_scene(path: Option<&Path>) -> anyhow::Result<SceneState> {
    match path {
        Some(path) => {
            let path = expand_home(path);
            SceneState::load(&path).map_err(|e| HelpfulError::invalid_scene(&path, &e.to_string()).into())
        }
        None => Ok(SceneState::default()),
    }
}

fn validate_root(root: &Path) -> Result<(), HelpfulError> {
    if !root.exists() {
        return Err(HelpfulError::path_not_found(root));
    }
    if !root.is_dir() {
        return Err(HelpfulError::not_a_directory(root));
    }
    Ok(())
}

pub fn run(args: LayersArgs) -> anyhow::Result<()> {
    let root = expand_home(&args.root);
    validate_root(&root)?;

    let config = load_config()?;
    let scene = load_scene(args.scene.as_deref())?;

    let mut collector = CachedDiskCollector::from_config(&config);
    let layers = if args.all_versions {
        collector.collect_all_versions(&root)
    } else {
        collector.collect(&root)
    };
    let rows = status_rows(&layers, &scene);
    let summary = StatusSummary::from_rows(&rows);
    info!(root = %root.display(), layers = rows.len(), "Layer status computed");

    if args.json {
        let output = LayersOutput {
            root: root.to_string_lossy().replace('\\', "/"),
            all_versions: args.all_versions,
            summary,
            layers: rows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No render layers found in {}", root.display());
        return Ok(());
    }

    print_status_table(&rows);
    println!(
        "{} layers: {} sync, {} outdated, {} unloaded",
        summary.total, summary.sync, summary.outdated, summary.unloaded
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: SyncState) -> LayerStatus {
        LayerStatus {
            layer: "RND_BG_TECH".to_string(),
            in_scene: 0,
            latest: 1,
            range: "0".to_string(),
            frames: "0".to_string(),
            aovs: 0,
            status,
            path: String::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            row(SyncState::Sync),
            row(SyncState::Unloaded),
            row(SyncState::Sync),
            row(SyncState::Outdated),
        ];
        let summary = StatusSummary::from_rows(&rows);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.sync, 2);
        assert_eq!(summary.outdated, 1);
        assert_eq!(summary.unloaded, 1);
    }

    #[test]
    fn test_validate_root() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(validate_root(temp.path()).is_ok());
        assert!(validate_root(&temp.path().join("missing")).is_err());

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let err = validate_root(&file).unwrap_err();
        assert!(err.message.contains("Not a directory"));
    }

    #[test]
    fn test_load_scene_without_path() {
        assert_eq!(load_scene(None).unwrap(), SceneState::default());
    }
}
