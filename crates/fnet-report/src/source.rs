use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use tracing::debug;

use crate::parse::parse_report;
use crate::table::TimeSeriesTable;

fn report_error(code: &str, message: impl Into<String>, dir: &Path) -> FnetError {
    FnetError::Report(ErrorInfo::new(code, message).with_context("dir", dir.display().to_string()))
}

/// Producer of report text for a simulation directory.
///
/// Implementations must be deterministic: the same command on the same
/// directory yields the same text.
pub trait ReportSource: Send + Sync {
    /// Returns the report text for `command` in the run directory `dir`.
    fn report(&self, command: ReportCommand, dir: &Path) -> Result<String, FnetError>;
}

/// Runs the simulator's report binary inside the run directory and captures stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBinary {
    program: PathBuf,
}

impl ReportBinary {
    /// Wraps the report binary at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the wrapped binary.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ReportSource for ReportBinary {
    fn report(&self, command: ReportCommand, dir: &Path) -> Result<String, FnetError> {
        debug!(program = %self.program.display(), %command, dir = %dir.display(), "invoking report");
        let output = Command::new(&self.program)
            .arg(command.as_str())
            .current_dir(dir)
            .output()
            .map_err(|err| {
                report_error(
                    "report_launch",
                    format!("could not run {}: {err}", self.program.display()),
                    dir,
                )
                .with_context("command", command.as_str())
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(report_error(
                "report_exit",
                format!("report exited with {}: {}", output.status, stderr.trim()),
                dir,
            )
            .with_context("command", command.as_str()));
        }
        String::from_utf8(output.stdout).map_err(|err| {
            report_error("report_encoding", err.to_string(), dir)
                .with_context("command", command.as_str())
        })
    }
}

/// Reads report output that was captured to files inside each run directory.
///
/// By default `fiber:force` output lives in `fiber_force.txt` and `fiber`
/// output in `fiber.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedReports {
    fiber_force: String,
    fiber: String,
}

impl Default for CapturedReports {
    fn default() -> Self {
        Self {
            fiber_force: "fiber_force.txt".to_string(),
            fiber: "fiber.txt".to_string(),
        }
    }
}

impl CapturedReports {
    /// Overrides the file name holding the output of `command`.
    pub fn with_file(mut self, command: ReportCommand, name: impl Into<String>) -> Self {
        match command {
            ReportCommand::FiberForce => self.fiber_force = name.into(),
            ReportCommand::Fiber => self.fiber = name.into(),
        }
        self
    }

    /// File name holding the output of `command`.
    pub fn file_name(&self, command: ReportCommand) -> &str {
        match command {
            ReportCommand::FiberForce => &self.fiber_force,
            ReportCommand::Fiber => &self.fiber,
        }
    }
}

impl ReportSource for CapturedReports {
    fn report(&self, command: ReportCommand, dir: &Path) -> Result<String, FnetError> {
        let path = dir.join(self.file_name(command));
        fs::read_to_string(&path).map_err(|err| {
            report_error(
                "captured_report_read",
                format!("could not read {}: {err}", path.display()),
                dir,
            )
            .with_context("command", command.as_str())
        })
    }
}

/// Fetches the report for `command` from `source` and parses it.
pub fn load_table(
    source: &dyn ReportSource,
    command: ReportCommand,
    dir: &Path,
) -> Result<TimeSeriesTable, FnetError> {
    let text = source.report(command, dir)?;
    let label = format!("{}[{}]", dir.display(), command);
    parse_report(command, &text, &label)
}
