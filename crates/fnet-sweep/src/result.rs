use std::collections::BTreeMap;

use fnet_core::{ErrorInfo, FnetError};
use fnet_stats::{Peak, StatRequest, StatisticName};
use serde::{Deserialize, Serialize};

/// Peaks of one statistic across every run, aligned with the input directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeakColumn {
    /// Peak values and the times at which they occur.
    Timed {
        /// Peak time per run.
        times: Vec<f64>,
        /// Peak value per run.
        values: Vec<f64>,
    },
    /// Scalar statistic per run.
    Values(Vec<f64>),
}

impl PeakColumn {
    /// Peak values in directory order.
    pub fn values(&self) -> &[f64] {
        match self {
            PeakColumn::Timed { values, .. } | PeakColumn::Values(values) => values,
        }
    }

    /// Peak times in directory order, for time-resolved statistics.
    pub fn times(&self) -> Option<&[f64]> {
        match self {
            PeakColumn::Timed { times, .. } => Some(times),
            PeakColumn::Values(_) => None,
        }
    }

    /// Number of runs covered.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// True when no runs are covered.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Peak of the `index`-th run.
    pub fn get(&self, index: usize) -> Option<Peak> {
        match self {
            PeakColumn::Timed { times, values } => Some(Peak::Timed {
                time: *times.get(index)?,
                value: *values.get(index)?,
            }),
            PeakColumn::Values(values) => values.get(index).copied().map(Peak::Scalar),
        }
    }
}

/// Map from statistic to its per-run peak column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AggregationResult {
    columns: BTreeMap<StatisticName, PeakColumn>,
}

impl AggregationResult {
    /// Column of `statistic`, if it was requested.
    pub fn get(&self, statistic: StatisticName) -> Option<&PeakColumn> {
        self.columns.get(&statistic)
    }

    /// Iterates over columns in statistic order.
    pub fn iter(&self) -> impl Iterator<Item = (StatisticName, &PeakColumn)> {
        self.columns.iter().map(|(name, column)| (*name, column))
    }

    /// Number of statistics.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no statistic was aggregated.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Builds columns from per-run rows, each holding one peak per request.
    pub fn from_rows(requests: &[StatRequest], rows: Vec<Vec<Peak>>) -> Result<Self, FnetError> {
        let mut columns = BTreeMap::new();
        for (slot, request) in requests.iter().enumerate() {
            let mut times = Vec::with_capacity(rows.len());
            let mut values = Vec::with_capacity(rows.len());
            for (index, row) in rows.iter().enumerate() {
                let peak = row.get(slot).ok_or_else(|| {
                    FnetError::Dispatch(
                        ErrorInfo::new("short_row", "run produced fewer peaks than requested")
                            .with_context("index", index.to_string())
                            .with_context("statistic", request.statistic.as_str()),
                    )
                })?;
                if let Some(time) = peak.time() {
                    times.push(time);
                }
                values.push(peak.value());
            }
            let column = if request.statistic.is_timed() {
                PeakColumn::Timed { times, values }
            } else {
                PeakColumn::Values(values)
            };
            columns.insert(request.statistic, column);
        }
        Ok(Self { columns })
    }
}
