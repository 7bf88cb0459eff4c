//! Versions command - every farm version of one layer

use crate::cli::config::load_config;
use crate::cli::error::HelpfulError;
use crate::cli::output::print_table;
use render_manager::config::expand_home;
use render_manager::farm::{collect_render_layers_from_snapshot, load_snapshot_or_empty};
use render_manager::layers::{latest_in_groups, versions_of, RenderLayer};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the versions command
#[derive(Debug)]
pub struct VersionsArgs {
    pub snapshot: PathBuf,
    pub layer: String,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct VersionRow {
    version: u32,
    batch_name: String,
    job_name: String,
    user: Option<String>,
    frames: String,
    frame_count: u64,
    progress: Option<String>,
    path: String,
}

impl From<&RenderLayer> for VersionRow {
    fn from(layer: &RenderLayer) -> Self {
        Self {
            version: layer.int_version(),
            batch_name: layer.version().to_string(),
            job_name: layer.full_name().to_string(),
            user: layer.user().map(str::to_string),
            frames: layer.frame_range(),
            frame_count: layer.frame_count(),
            progress: layer.progress().map(str::to_string),
            path: layer.path().to_string(),
        }
    }
}

pub fn run(args: VersionsArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let snapshot = load_snapshot_or_empty(&expand_home(&args.snapshot));
    let groups = collect_render_layers_from_snapshot(&snapshot, &config.tokens);

    let versions = versions_of(&groups, &args.layer);
    if versions.is_empty() {
        let available: Vec<String> = latest_in_groups(&groups)
            .iter()
            .map(|layer| layer.name().to_string())
            .collect();
        return Err(HelpfulError::layer_not_found(&args.layer, &available).into());
    }

    let rows: Vec<VersionRow> = versions.iter().map(VersionRow::from).collect();

    if args.json {
        let output = serde_json::json!({
            "layer": args.layer,
            "versions": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", args.layer);
    print_table(
        &["Version", "Batch", "User", "Frames", "Progress", "Path"],
        rows.into_iter()
            .map(|row| {
                vec![
                    format!("v{:03}", row.version),
                    row.batch_name,
                    row.user.unwrap_or_else(|| "---".to_string()),
                    format!("{} ({})", row.frames, row.frame_count),
                    row.progress.unwrap_or_else(|| "---".to_string()),
                    row.path,
                ]
            })
            .collect(),
    );
    Ok(())
}
