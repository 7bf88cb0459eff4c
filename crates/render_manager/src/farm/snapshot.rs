//! Job snapshots
//!
//! A snapshot freezes the farm state of one shot into JSON so views can be
//! rebuilt without querying the farm again.

use crate::farm::collector::{job_details, JobsByStatus, RENDERING};
use crate::farm::command::StatusQuery;
use crate::farm::error::Result;
use crate::layers::classifier::{classify, validate_version_token};
use crate::layers::latest::{group_by_role, LayersByRole};
use crate::layers::tokens::TokenConfig;
use crate::layers::types::{parse_digits, FrameRange, LayerSource, RenderLayer, VersionToken};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Timestamp format of [`SnapshotMetadata::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub sequence: String,
    pub shot: String,
    pub plugin: String,
    #[serde(alias = "collection_timestamp")]
    pub timestamp: String,
    pub total_jobs: usize,
}

/// One job as stored in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_name: Option<String>,
    pub batch_name: Option<String>,
    pub render_layer: Option<String>,
    /// Version number text, e.g. `0026`.
    pub version: Option<String>,
    pub user: Option<String>,
    pub frames: Option<String>,
    pub output_directories: Option<String>,
    /// Only recorded for rendering jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobsSnapshot {
    pub metadata: SnapshotMetadata,
    #[serde(default)]
    pub jobs_by_status: BTreeMap<String, Vec<JobRecord>>,
}

impl JobsSnapshot {
    /// Freeze collected jobs, fetching progress for rendering jobs.
    pub fn from_jobs(
        jobs: &JobsByStatus,
        query: &dyn StatusQuery,
        tokens: &TokenConfig,
        seq: &str,
        shot: &str,
        plugin: &str,
    ) -> Self {
        let mut jobs_by_status = BTreeMap::new();

        for (status, status_jobs) in jobs {
            let records = status_jobs
                .iter()
                .map(|job| {
                    let progress = if status == RENDERING {
                        job.id()
                            .and_then(|id| job_details(query, id).progress().map(str::to_string))
                    } else {
                        None
                    };
                    JobRecord {
                        job_name: job.job_name().map(str::to_string),
                        batch_name: job.batch_name().map(str::to_string),
                        render_layer: job.render_layer(tokens).map(str::to_string),
                        version: job.version_name(),
                        user: job.user().map(str::to_string),
                        frames: job.frames().map(str::to_string),
                        output_directories: job.output_directories().map(str::to_string),
                        progress,
                    }
                })
                .collect();
            jobs_by_status.insert(status.clone(), records);
        }

        Self {
            metadata: SnapshotMetadata {
                sequence: seq.to_string(),
                shot: shot.to_string(),
                plugin: plugin.to_string(),
                timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
                total_jobs: jobs.values().map(Vec::len).sum(),
            },
            jobs_by_status,
        }
    }

    pub fn total_jobs(&self) -> usize {
        self.jobs_by_status.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_jobs() == 0
    }
}

/// `jobs_<seq>_<shot>_<plugin>.json`
pub fn snapshot_file_name(seq: &str, shot: &str, plugin: &str) -> String {
    format!("jobs_{}_{}_{}.json", seq, shot, plugin)
}

/// Write `snapshot` pretty-printed into `output_dir`, creating the directory.
pub fn write_snapshot(snapshot: &JobsSnapshot, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let meta = &snapshot.metadata;
    let path = output_dir.join(snapshot_file_name(&meta.sequence, &meta.shot, &meta.plugin));
    let content = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, content)?;
    info!(path = %path.display(), jobs = snapshot.total_jobs(), "Job snapshot written");
    Ok(path)
}

pub fn load_snapshot(path: &Path) -> Result<JobsSnapshot> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// [`load_snapshot`], logging any failure and returning an empty snapshot.
pub fn load_snapshot_or_empty(path: &Path) -> JobsSnapshot {
    match load_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not load job snapshot, using empty snapshot");
            JobsSnapshot::default()
        }
    }
}

fn layer_from_record(record: &JobRecord, tokens: &TokenConfig) -> Option<RenderLayer> {
    let Some(name) = record.render_layer.as_deref() else {
        warn!(job = ?record.job_name, "Job without render layer");
        return None;
    };
    let layer_tokens = classify(name, tokens).ok()?;

    let batch = record.batch_name.as_deref().unwrap_or_default();
    validate_version_token(batch, tokens).ok()?;

    let Some(number) = record.version.as_deref().and_then(parse_digits) else {
        warn!(layer = %name, version = ?record.version, "Invalid job version");
        return None;
    };

    let layer = RenderLayer::new(
        name,
        layer_tokens,
        VersionToken::with_number(batch, number),
        record.output_directories.as_deref().unwrap_or_default(),
        LayerSource::Farm,
    )
    .with_full_name(record.job_name.as_deref().unwrap_or(name))
    .with_frames(record.frames.as_deref().and_then(FrameRange::parse))
    .with_user(record.user.clone())
    .with_progress(record.progress.clone());
    Some(layer)
}

/// Valid farm layers of `snapshot`, grouped by role. Invalid jobs are logged
/// and skipped.
pub fn collect_render_layers_from_snapshot(snapshot: &JobsSnapshot, tokens: &TokenConfig) -> LayersByRole {
    let mut layers = Vec::new();
    for (status, records) in &snapshot.jobs_by_status {
        info!(status = %status, jobs = records.len(), "Collecting render layers");
        layers.extend(records.iter().filter_map(|record| layer_from_record(record, tokens)));
    }
    group_by_role(layers)
}
