#![deny(missing_docs)]
#![doc = "Peak aggregation over fiber-network parameter sweeps: per-directory extraction fanned out to a worker pool with index-aligned results."]

/// Per-run statistic extraction and cross-run aggregation.
pub mod aggregate;
/// Run-scoped memoization of computed statistics.
pub mod cache;
/// Canonical JSON, plan digests and YAML files.
pub mod codec;
/// Worker pool and sweep execution.
pub mod dispatch;
/// Sweep plan loading and run discovery.
pub mod plan;
/// Report assembly and CSV export.
pub mod report;
/// Index-aligned aggregation results.
pub mod result;

pub use aggregate::Aggregator;
pub use cache::StatCache;
pub use dispatch::{run_indexed, run_sweep, run_sweep_from_path, RunOpts};
pub use plan::{load_plan, SourceSpec, StatEntry, SweepPlan};
pub use report::{write_parameters_csv, write_report, write_series_csv, SweepReport};
pub use result::{AggregationResult, PeakColumn};
