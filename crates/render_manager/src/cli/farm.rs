//! Farm command - collect job snapshots and show farm layer status

use crate::cli::config::load_config;
use crate::cli::error::HelpfulError;
use crate::cli::layers::{load_scene, StatusSummary};
use crate::cli::output::{print_status_table, print_table};
use clap::Subcommand;
use render_manager::config::expand_home;
use render_manager::farm::{
    collect_jobs, collect_render_layers_from_snapshot, load_snapshot_or_empty, write_snapshot,
    DeadlineCommand, JobsSnapshot,
};
use render_manager::layers::{latest_in_groups, status_rows, LayerStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Subcommands for farm snapshots
#[derive(Subcommand, Debug, Clone)]
pub enum FarmAction {
    /// Query the farm for a shot's jobs and write a snapshot
    Collect {
        /// Sequence, e.g. KAF
        #[arg(long)]
        seq: String,
        /// Shot, e.g. 010
        #[arg(long)]
        shot: String,
        /// Farm plugin (defaults to the configured plugin)
        #[arg(long)]
        plugin: Option<String>,
        /// Directory for the snapshot file
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show the latest farm layers of a snapshot against a scene
    Show {
        /// Snapshot file written by `farm collect`
        snapshot: PathBuf,
        /// Scene state JSON
        #[arg(long)]
        scene: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

impl FarmAction {
    pub fn wants_json(&self) -> bool {
        match self {
            FarmAction::Collect { json, .. } | FarmAction::Show { json, .. } => *json,
        }
    }
}

#[derive(Debug, Serialize)]
struct CollectOutput {
    path: Option<String>,
    sequence: String,
    shot: String,
    plugin: String,
    total_jobs: usize,
    jobs_by_status: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    snapshot: String,
    sequence: String,
    shot: String,
    plugin: String,
    timestamp: String,
    summary: StatusSummary,
    layers: Vec<LayerStatus>,
}

pub fn run(action: FarmAction) -> anyhow::Result<()> {
    match action {
        FarmAction::Collect {
            seq,
            shot,
            plugin,
            output_dir,
            json,
        } => collect(seq, shot, plugin, output_dir, json),
        FarmAction::Show {
            snapshot,
            scene,
            json,
        } => show(snapshot, scene, json),
    }
}

fn collect(
    seq: String,
    shot: String,
    plugin: Option<String>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let plugin = plugin.unwrap_or_else(|| config.farm.plugin.clone());
    let query = DeadlineCommand::new(&config.farm.command);

    let jobs = collect_jobs(&query, &seq, &shot, &plugin, config.farm.statuses.as_slice());
    let counts: BTreeMap<String, usize> = jobs.iter().map(|(status, jobs)| (status.clone(), jobs.len())).collect();
    let total: usize = counts.values().sum();

    let path = if jobs.is_empty() {
        warn!(seq = %seq, shot = %shot, plugin = %plugin, "No jobs found for the shot");
        None
    } else {
        let snapshot = JobsSnapshot::from_jobs(&jobs, &query, &config.tokens, &seq, &shot, &plugin);
        let dir = output_dir
            .map(|dir| expand_home(&dir))
            .unwrap_or_else(|| config.farm.snapshot_dir());
        let path = write_snapshot(&snapshot, &dir).map_err(|e| {
            HelpfulError::new("Failed to write job snapshot")
                .with_context(format!("{} ({})", dir.display(), e))
                .with_suggestion("TRY: Pass a writable directory with --output-dir")
        })?;
        Some(path)
    };
    info!(total_jobs = total, "Farm collection finished");

    if json {
        let output = CollectOutput {
            path: path.as_ref().map(|p| p.to_string_lossy().to_string()),
            sequence: seq,
            shot,
            plugin,
            total_jobs: total,
            jobs_by_status: counts,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match path {
        Some(path) => {
            print_table(
                &["Status", "Jobs"],
                counts.iter().map(|(status, n)| vec![status.clone(), n.to_string()]).collect(),
            );
            println!("Snapshot written: {}", path.display());
        }
        None => println!("No jobs found for {}_{} ({})", seq, shot, plugin),
    }
    Ok(())
}

fn show(snapshot_path: PathBuf, scene: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let scene = load_scene(scene.as_deref())?;
    let snapshot_path = expand_home(&snapshot_path);

    let snapshot = load_snapshot_or_empty(&snapshot_path);
    if snapshot.is_empty() {
        eprintln!(
            "WARNING: no jobs in snapshot {} (missing, unreadable or empty)",
            snapshot_path.display()
        );
    }

    let groups = collect_render_layers_from_snapshot(&snapshot, &config.tokens);
    let latest = latest_in_groups(&groups);
    let rows = status_rows(&latest, &scene);
    let summary = StatusSummary::from_rows(&rows);

    if json {
        let meta = snapshot.metadata;
        let output = ShowOutput {
            snapshot: snapshot_path.to_string_lossy().to_string(),
            sequence: meta.sequence,
            shot: meta.shot,
            plugin: meta.plugin,
            timestamp: meta.timestamp,
            summary,
            layers: rows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let meta = &snapshot.metadata;
    if !meta.sequence.is_empty() {
        println!(
            "{}_{} ({}) collected {}",
            meta.sequence, meta.shot, meta.plugin, meta.timestamp
        );
    }
    if rows.is_empty() {
        println!("No valid render layers in snapshot");
        return Ok(());
    }
    print_status_table(&rows);
    println!(
        "{} layers: {} sync, {} outdated, {} unloaded",
        summary.total, summary.sync, summary.outdated, summary.unloaded
    );
    Ok(())
}
