use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use fnet_sweep::{load_plan, run_sweep, write_report};
use tracing::info;

#[derive(Args, Debug)]
pub struct PeaksArgs {
    /// Sweep plan YAML.
    #[arg(long)]
    pub plan: PathBuf,
    /// Output directory for peaks.json and peaks.csv.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker count overriding the plan.
    #[arg(long)]
    pub workers: Option<usize>,
}

pub fn run(args: &PeaksArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let mut opts = plan.run_opts();
    if let Some(workers) = args.workers {
        opts.workers = workers;
    }
    let report = run_sweep(&plan, &opts)?;
    write_report(&args.out, &report)?;
    info!(
        runs = report.directories.len(),
        statistics = report.peaks.len(),
        plan_hash = %report.plan_hash,
        "peaks written"
    );
    Ok(())
}
