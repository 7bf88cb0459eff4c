//! Farm job records

use crate::farm::parse::Fields;
use crate::layers::classifier::render_layer_from_job_name;
use crate::layers::tokens::{TokenConfig, DELIMITER};

/// One job as listed by `-GetJobsFilterAnd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmJob {
    fields: Fields,
}

impl FarmJob {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.field("ID")
    }

    /// `JobName`, falling back to `Name` for older farm versions.
    pub fn job_name(&self) -> Option<&str> {
        self.field("JobName").or_else(|| self.field("Name"))
    }

    /// Batch name, e.g. `LGT_KAF_010_v0026`.
    pub fn batch_name(&self) -> Option<&str> {
        self.field("BatchName")
    }

    /// Version number text of the batch name: `LGT_KAF_010_v0026` -> `0026`.
    pub fn version_name(&self) -> Option<String> {
        let last = self.batch_name()?.rsplit(DELIMITER).next()?;
        let mut chars = last.chars();
        chars.next();
        Some(chars.as_str().to_string())
    }

    /// Render layer at the end of the job name.
    pub fn render_layer<'a>(&'a self, tokens: &TokenConfig) -> Option<&'a str> {
        render_layer_from_job_name(self.job_name()?, tokens)
    }

    pub fn frames(&self) -> Option<&str> {
        self.field("FramesList")
    }

    pub fn user(&self) -> Option<&str> {
        self.field("UserName")
    }

    pub fn status(&self) -> Option<&str> {
        self.field("Status")
    }

    pub fn output_directories(&self) -> Option<&str> {
        self.field("OutputDirectories")
    }

    /// Scene files submitted along with the job.
    pub fn auxiliary_files(&self) -> Option<&str> {
        self.field("AuxiliarySubmissionFileNames")
    }
}

/// Output of `-GetJobDetails` for one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDetails {
    fields: Fields,
}

impl JobDetails {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn progress(&self) -> Option<&str> {
        self.field("Progress")
    }

    pub fn errors(&self) -> Option<&str> {
        self.field("Errors")
    }

    pub fn completed(&self) -> Option<&str> {
        self.field("Completed")
    }

    pub fn failed(&self) -> Option<&str> {
        self.field("Failed")
    }

    pub fn pending(&self) -> Option<&str> {
        self.field("Pending")
    }

    pub fn queued(&self) -> Option<&str> {
        self.field("Queued")
    }

    pub fn rendering(&self) -> Option<&str> {
        self.field("Rendering")
    }

    pub fn suspended(&self) -> Option<&str> {
        self.field("Suspended")
    }
}
