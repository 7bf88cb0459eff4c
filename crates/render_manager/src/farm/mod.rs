//! Render farm status collection
//!
//! Queries `deadlinecommand` for the jobs of one shot, parses its text
//! output and freezes the result into JSON snapshots.

pub mod collector;
pub mod command;
pub mod error;
pub mod job;
pub mod parse;
pub mod snapshot;

pub use collector::{collect_jobs, job_details, JobsByStatus, STATUSES};
pub use command::{DeadlineCommand, StatusQuery};
pub use error::{FarmError, Result};
pub use job::{FarmJob, JobDetails};
pub use snapshot::{
    collect_render_layers_from_snapshot, load_snapshot, load_snapshot_or_empty, write_snapshot,
    JobRecord, JobsSnapshot, SnapshotMetadata,
};
