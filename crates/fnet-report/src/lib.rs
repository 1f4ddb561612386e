#![deny(missing_docs)]
#![doc = "Turns marker-delimited simulator report text into time-indexed tables and reads sweep parameters from run configs."]

/// Parameter values stored at the top of a run configuration.
pub mod config;
/// Line-oriented parser for report text.
pub mod parse;
/// External report producers.
pub mod source;
/// Column-major per-time tables.
pub mod table;

pub use config::{parse_params, read_params, ParameterSet, CONFIG_FILE};
pub use parse::{parse_report, ReportParser};
pub use source::{load_table, CapturedReports, ReportBinary, ReportSource};
pub use table::{TimeSeriesTable, TimeSlice};
