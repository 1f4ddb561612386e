use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use fnet_sweep::{SourceSpec, StatEntry, SweepPlan};
use tracing::info;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Directory holding the runs; stored as an absolute path.
    #[arg(long)]
    pub root: PathBuf,
    /// Destination path for the plan YAML.
    #[arg(long)]
    pub out: PathBuf,
    /// Statistic or bundle, optionally with a policy: `radius:min`, `all`.
    #[arg(long = "stat", value_name = "NAME[:POLICY]", default_value = "mainstats")]
    pub stats: Vec<String>,
    /// Number of sweep parameters per run.
    #[arg(long, default_value_t = 2)]
    pub numparams: usize,
    /// Worker count.
    #[arg(long, default_value_t = 1)]
    pub workers: usize,
    /// Use captured report files instead of the report binary.
    #[arg(long)]
    pub captured: bool,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let statistics = args
        .stats
        .iter()
        .map(|raw| match raw.split_once(':') {
            Some((name, policy)) => StatEntry::new(name, Some(policy)),
            None => StatEntry::new(raw.as_str(), None),
        })
        .collect();
    // Plans resolve relative paths against their own directory, not ours.
    let root = if args.root.is_absolute() {
        args.root.clone()
    } else {
        env::current_dir()?.join(&args.root)
    };
    let mut plan = SweepPlan::new(Vec::new(), statistics);
    plan.root = Some(root);
    plan.numparams = args.numparams;
    plan.workers = args.workers;
    if args.captured {
        plan.source = SourceSpec::Captured {
            fiber_force: None,
            fiber: None,
        };
    }
    plan.requests()?;
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.out, plan.to_yaml_string()?)?;
    info!(out = %args.out.display(), plan_hash = %plan.plan_hash()?, "plan written");
    Ok(())
}
