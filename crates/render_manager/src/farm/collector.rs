//! Farm-status collector
//!
//! Polls the farm once per job status for one shot.

use crate::farm::command::{query_or_empty, StatusQuery};
use crate::farm::job::{FarmJob, JobDetails};
use crate::farm::parse::{parse_job_blocks, parse_job_details};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Job statuses polled by default.
pub const STATUSES: [&str; 5] = ["Completed", "Failed", "Queued", "Rendering", "Suspended"];

/// Status whose jobs report live progress.
pub const RENDERING: &str = "Rendering";

/// Jobs keyed by status. Statuses without jobs are absent.
pub type JobsByStatus = BTreeMap<String, Vec<FarmJob>>;

/// Batch name shared by every job of a shot.
pub fn batch_name(seq: &str, shot: &str) -> String {
    format!("{}_{}", seq, shot)
}

fn job_filter_args(plugin: &str, status: &str, batch: &str) -> Vec<String> {
    vec![
        "-GetJobsFilterAnd".to_string(),
        format!("PluginName={}", plugin),
        format!("Status={}", status),
        format!("BatchName={}", batch),
    ]
}

/// Query the jobs of `seq`/`shot` for every status in `statuses`.
pub fn collect_jobs<S: AsRef<str>>(
    query: &dyn StatusQuery,
    seq: &str,
    shot: &str,
    plugin: &str,
    statuses: &[S],
) -> JobsByStatus {
    let batch = batch_name(seq, shot);
    let mut jobs = JobsByStatus::new();

    for status in statuses {
        let status = status.as_ref();
        info!(status = %status, batch = %batch, plugin = %plugin, "Collecting jobs");

        let output = query_or_empty(query, &job_filter_args(plugin, status, &batch));
        let text = String::from_utf8_lossy(&output);
        if text.trim().is_empty() {
            info!(status = %status, "No jobs found");
            continue;
        }

        let found: Vec<FarmJob> = parse_job_blocks(&text).into_iter().map(FarmJob::new).collect();
        debug!(status = %status, jobs = found.len(), "Parsed jobs");
        jobs.insert(status.to_string(), found);
    }
    jobs
}

/// Fetch the details of job `id`. Failures yield empty details.
pub fn job_details(query: &dyn StatusQuery, id: &str) -> JobDetails {
    let output = query_or_empty(query, &["-GetJobDetails".to_string(), id.to_string()]);
    JobDetails::new(parse_job_details(&String::from_utf8_lossy(&output)))
}
