use std::fs;
use std::path::{Path, PathBuf};

use fnet_core::errors::{ErrorInfo, FnetError};
use fnet_stats::Statistic;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::result::AggregationResult;
use crate::codec::write_canonical_json;

fn export_error(path: &Path, err: impl ToString) -> FnetError {
    FnetError::Serde(
        ErrorInfo::new("export", err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Outcome of a sweep: parameters and peaks aligned with `directories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Hash of the plan that produced the report.
    pub plan_hash: String,
    /// Run directories in aggregation order.
    pub directories: Vec<String>,
    /// `parameters[j][i]` is parameter `j` of run `i`.
    pub parameters: Vec<Vec<f64>>,
    /// Peak columns per statistic.
    pub peaks: AggregationResult,
}

impl SweepReport {
    /// Assembles a report.
    pub fn new(
        plan_hash: String,
        directories: &[PathBuf],
        parameters: Vec<Vec<f64>>,
        peaks: AggregationResult,
    ) -> Self {
        Self {
            plan_hash,
            directories: directories
                .iter()
                .map(|dir| dir.display().to_string())
                .collect(),
            parameters,
            peaks,
        }
    }

    /// Header of the tabular export: `dir`, `param<j>`, then per statistic
    /// `<name>_time` (time-resolved only) and `<name>`.
    pub fn csv_header(&self) -> Vec<String> {
        let mut header = vec!["dir".to_string()];
        header.extend((0..self.parameters.len()).map(|j| format!("param{j}")));
        for (name, column) in self.peaks.iter() {
            if column.times().is_some() {
                header.push(format!("{name}_time"));
            }
            header.push(name.to_string());
        }
        header
    }

    /// Row `index` of the tabular export.
    pub fn csv_row(&self, index: usize) -> Vec<String> {
        let mut row = vec![self.directories.get(index).cloned().unwrap_or_default()];
        row.extend(
            self.parameters
                .iter()
                .map(|param| cell(param.get(index).copied())),
        );
        for (_, column) in self.peaks.iter() {
            if let Some(times) = column.times() {
                row.push(cell(times.get(index).copied()));
            }
            row.push(cell(column.values().get(index).copied()));
        }
        row
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes `peaks.json` (canonical JSON) and `peaks.csv` into `out_dir`.
pub fn write_report(out_dir: &Path, report: &SweepReport) -> Result<(), FnetError> {
    fs::create_dir_all(out_dir).map_err(|err| export_error(out_dir, err))?;
    write_canonical_json(&out_dir.join("peaks.json"), report)?;

    let csv_path = out_dir.join("peaks.csv");
    let mut wtr = csv::Writer::from_path(&csv_path).map_err(|err| export_error(&csv_path, err))?;
    wtr.write_record(report.csv_header())
        .map_err(|err| export_error(&csv_path, err))?;
    for index in 0..report.directories.len() {
        wtr.write_record(report.csv_row(index))
            .map_err(|err| export_error(&csv_path, err))?;
    }
    wtr.flush().map_err(|err| export_error(&csv_path, err))?;
    info!(out = %out_dir.display(), runs = report.directories.len(), "wrote sweep report");
    Ok(())
}

/// Writes one statistic of one run as `time,value` rows, or a single `value`
/// row for scalar statistics.
pub fn write_series_csv(path: &Path, statistic: &Statistic) -> Result<(), FnetError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|err| export_error(path, err))?;
    match statistic {
        Statistic::Series(series) => {
            wtr.write_record(["time", "value"])
                .map_err(|err| export_error(path, err))?;
            for (time, value) in series.times.iter().zip(&series.values) {
                wtr.write_record([time.to_string(), value.to_string()])
                    .map_err(|err| export_error(path, err))?;
            }
        }
        Statistic::Scalar(value) => {
            wtr.write_record(["value"]).map_err(|err| export_error(path, err))?;
            wtr.write_record([value.to_string()])
                .map_err(|err| export_error(path, err))?;
        }
    }
    wtr.flush().map_err(|err| export_error(path, err))
}

/// Writes the sweep parameters as one row per run: `dir,param0,param1,...`.
pub fn write_parameters_csv(
    path: &Path,
    directories: &[PathBuf],
    parameters: &[Vec<f64>],
) -> Result<(), FnetError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|err| export_error(path, err))?;
    let mut header = vec!["dir".to_string()];
    header.extend((0..parameters.len()).map(|j| format!("param{j}")));
    wtr.write_record(&header).map_err(|err| export_error(path, err))?;
    for (index, dir) in directories.iter().enumerate() {
        let mut row = vec![dir.display().to_string()];
        row.extend(parameters.iter().map(|param| cell(param.get(index).copied())));
        wtr.write_record(&row).map_err(|err| export_error(path, err))?;
    }
    wtr.flush().map_err(|err| export_error(path, err))
}
