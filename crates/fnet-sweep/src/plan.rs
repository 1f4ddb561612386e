use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fnet_core::errors::{ErrorInfo, FnetError};
use fnet_core::ReportCommand;
use fnet_report::{CapturedReports, ReportBinary, ReportSource, CONFIG_FILE};
use fnet_stats::{expand_requests, StatRequest};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::dispatch::RunOpts;
use crate::codec::{content_digest, read_yaml, yaml_string};

/// Where report text for each run comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceSpec {
    /// Invoke the simulator's report binary inside each run directory.
    Binary {
        /// Program name looked up on `PATH`, or a path relative to the plan.
        program: PathBuf,
    },
    /// Read report output previously captured to files in each run directory.
    Captured {
        /// File holding `fiber:force` output.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fiber_force: Option<String>,
        /// File holding `fiber` output.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fiber: Option<String>,
    },
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Binary {
            program: PathBuf::from("report"),
        }
    }
}

/// One requested statistic or bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Statistic or bundle name.
    pub name: String,
    /// Peak policy name; bundles carry their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

impl StatEntry {
    /// Entry for `name` with an optional policy.
    pub fn new(name: impl Into<String>, policy: Option<&str>) -> Self {
        Self {
            name: name.into(),
            policy: policy.map(str::to_string),
        }
    }
}

/// Parameter sweep to aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Report producer.
    #[serde(default)]
    pub source: SourceSpec,
    /// Directory searched for runs (any directory holding the config file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Explicit run directories, kept in the listed order.
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    /// Configuration file name inside each run.
    #[serde(default = "SweepPlan::default_config_file")]
    pub config_file: String,
    /// Number of sweep parameters read from each configuration.
    #[serde(default = "SweepPlan::default_numparams")]
    pub numparams: usize,
    /// Worker count.
    #[serde(default = "SweepPlan::default_workers")]
    pub workers: usize,
    /// Statistics to aggregate.
    pub statistics: Vec<StatEntry>,
    /// Directory containing the plan on disk (ignored when serializing).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl SweepPlan {
    fn default_config_file() -> String {
        CONFIG_FILE.to_string()
    }

    fn default_numparams() -> usize {
        2
    }

    fn default_workers() -> usize {
        1
    }

    /// Plan over explicit directories with default settings.
    pub fn new(directories: Vec<PathBuf>, statistics: Vec<StatEntry>) -> Self {
        Self {
            source: SourceSpec::default(),
            root: None,
            directories,
            config_file: Self::default_config_file(),
            numparams: Self::default_numparams(),
            workers: Self::default_workers(),
            statistics,
            base_dir: PathBuf::new(),
        }
    }

    /// Resolves the statistic entries (bundles expanded) into requests.
    pub fn requests(&self) -> Result<Vec<StatRequest>, FnetError> {
        expand_requests(
            self.statistics
                .iter()
                .map(|entry| (entry.name.as_str(), entry.policy.as_deref())),
        )
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Run directories in aggregation order.
    ///
    /// The explicit list comes first, as written. Directories discovered under
    /// `root` follow in lexicographic order, skipping any already listed.
    pub fn run_directories(&self) -> Result<Vec<PathBuf>, FnetError> {
        let mut dirs: Vec<PathBuf> = self.directories.iter().map(|d| self.resolve(d)).collect();
        if let Some(root) = &self.root {
            let root = self.resolve(root);
            let listed: BTreeSet<PathBuf> = dirs.iter().cloned().collect();
            let mut found = BTreeSet::new();
            for entry in WalkDir::new(&root).follow_links(true) {
                let entry = entry.map_err(|err| {
                    FnetError::Config(
                        ErrorInfo::new("run_discovery", err.to_string())
                            .with_context("dir", root.display().to_string()),
                    )
                })?;
                if entry.file_type().is_file() && entry.file_name() == self.config_file.as_str() {
                    if let Some(parent) = entry.path().parent() {
                        if !listed.contains(parent) {
                            found.insert(parent.to_path_buf());
                        }
                    }
                }
            }
            dirs.extend(found);
        }
        if dirs.is_empty() {
            return Err(FnetError::Config(
                ErrorInfo::new("empty_sweep", "the plan names no run directories")
                    .with_hint("list directories or point root at runs holding the config file"),
            ));
        }
        Ok(dirs)
    }

    /// Report producer described by the plan.
    pub fn report_source(&self) -> Arc<dyn ReportSource> {
        match &self.source {
            SourceSpec::Binary { program } => {
                let program = if program.components().count() > 1 {
                    self.resolve(program)
                } else {
                    program.clone()
                };
                Arc::new(ReportBinary::new(program))
            }
            SourceSpec::Captured { fiber_force, fiber } => {
                let mut captured = CapturedReports::default();
                if let Some(name) = fiber_force {
                    captured = captured.with_file(ReportCommand::FiberForce, name.clone());
                }
                if let Some(name) = fiber {
                    captured = captured.with_file(ReportCommand::Fiber, name.clone());
                }
                Arc::new(captured)
            }
        }
    }

    /// Execution options carried by the plan.
    pub fn run_opts(&self) -> RunOpts {
        RunOpts::with_workers(self.workers)
    }

    /// Deterministic hash of the plan contents.
    pub fn plan_hash(&self) -> Result<String, FnetError> {
        content_digest(self)
    }

    /// YAML representation of the plan.
    pub fn to_yaml_string(&self) -> Result<String, FnetError> {
        yaml_string(self)
    }
}

/// Loads a plan from disk and validates its statistics and worker count.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<SweepPlan, FnetError> {
    let plan_path = path.as_ref();
    let mut plan: SweepPlan = read_yaml(plan_path)?;
    plan.base_dir = plan_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    plan.requests()?;
    if plan.workers == 0 {
        return Err(FnetError::Dispatch(
            ErrorInfo::new("zero_workers", "at least one worker is required")
                .with_context("path", plan_path.display().to_string()),
        ));
    }
    Ok(plan)
}
