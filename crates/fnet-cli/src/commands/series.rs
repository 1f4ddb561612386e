use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fnet_report::{CapturedReports, ReportBinary, ReportSource};
use fnet_stats::StatisticName;
use fnet_sweep::{write_series_csv, Aggregator, RunOpts};

#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Run directory.
    #[arg(long)]
    pub dir: PathBuf,
    /// Statistic name (radius, force, tension, contraction_rate, ...).
    #[arg(long)]
    pub stat: String,
    /// Report binary invoked inside the run directory.
    #[arg(long, default_value = "report", conflicts_with = "captured")]
    pub report: PathBuf,
    /// Read fiber_force.txt and fiber.txt from the run directory instead.
    #[arg(long)]
    pub captured: bool,
    /// Destination CSV.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &SeriesArgs) -> Result<(), Box<dyn Error>> {
    let statistic: StatisticName = args.stat.parse()?;
    let source: Arc<dyn ReportSource> = if args.captured {
        Arc::new(CapturedReports::default())
    } else {
        Arc::new(ReportBinary::new(&args.report))
    };
    let aggregator = Aggregator::new(vec![args.dir.clone()], source, RunOpts::default())?;
    let values = aggregator.series(0, statistic)?;
    write_series_csv(&args.out, &values)?;
    Ok(())
}
