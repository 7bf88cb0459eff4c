//! Farm command invocation

use crate::farm::error::{FarmError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Runs the farm's command-line tool.
///
/// Implementations block until the tool exits and return its whole stdout.
pub trait StatusQuery {
    fn query(&self, args: &[String]) -> Result<Vec<u8>>;
}

/// Run `args` and turn any failure into empty output, logging it.
///
/// Callers treat empty output as "no jobs".
pub fn query_or_empty(query: &dyn StatusQuery, args: &[String]) -> Vec<u8> {
    match query.query(args) {
        Ok(output) => output,
        Err(err) => {
            warn!(error = %err, "Farm query failed, treating as no jobs");
            Vec::new()
        }
    }
}

/// Invokes `deadlinecommand` as a child process.
#[derive(Debug, Clone)]
pub struct DeadlineCommand {
    program: PathBuf,
}

impl DeadlineCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl StatusQuery for DeadlineCommand {
    fn query(&self, args: &[String]) -> Result<Vec<u8>> {
        debug!(program = %self.program.display(), args = ?args, "Running farm command");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| FarmError::ExternalToolFailure {
                command: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let reason = format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            if output.stdout.is_empty() {
                return Err(FarmError::ExternalToolFailure {
                    command: self.program.display().to_string(),
                    reason,
                });
            }
            warn!(program = %self.program.display(), reason = %reason, "Farm command exited with an error, keeping its output");
        }

        Ok(output.stdout)
    }
}
