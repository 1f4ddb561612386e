use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    params::{self, ParamsArgs},
    peaks::{self, PeaksArgs},
    plan::{self, PlanArgs},
    series::{self, SeriesArgs},
};
use tracing::Level;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "fnet", about = "Fiber-network sweep post-processing")]
struct Cli {
    /// Log debug events (per-directory progress, report invocations).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sweep plan for the runs below a directory.
    Plan(PlanArgs),
    /// Aggregate peak statistics over every run of a plan.
    Peaks(PeaksArgs),
    /// Export one statistic of one run as a time series.
    Series(SeriesArgs),
    /// Export the sweep parameters of every run of a plan.
    Params(ParamsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fnet: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Plan(args) => plan::run(&args),
        Command::Peaks(args) => peaks::run(&args),
        Command::Series(args) => series::run(&args),
        Command::Params(args) => params::run(&args),
    }
}
