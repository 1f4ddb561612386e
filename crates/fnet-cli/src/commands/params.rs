use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use fnet_sweep::{load_plan, write_parameters_csv, Aggregator};

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Sweep plan YAML.
    #[arg(long)]
    pub plan: PathBuf,
    /// Destination CSV.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &ParamsArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let aggregator = Aggregator::new(plan.run_directories()?, plan.report_source(), plan.run_opts())?
        .with_config_file(plan.config_file.clone());
    let parameters = aggregator.parameters(plan.numparams)?;
    write_parameters_csv(&args.out, aggregator.directories(), &parameters)?;
    Ok(())
}
