use std::fmt;
use std::str::FromStr;

use fnet_core::{ErrorInfo, FnetError};
use serde::{Deserialize, Serialize};

use crate::series::Statistic;

/// Which extremum of a series is reported as its peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeakPolicy {
    /// The extremum with the larger magnitude; the minimum wins exact ties.
    #[default]
    Absolute,
    /// The maximum value.
    Max,
    /// The minimum value.
    Min,
}

impl PeakPolicy {
    /// Every policy, in code order.
    pub const ALL: [PeakPolicy; 3] = [PeakPolicy::Absolute, PeakPolicy::Max, PeakPolicy::Min];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeakPolicy::Absolute => "absolute",
            PeakPolicy::Max => "max",
            PeakPolicy::Min => "min",
        }
    }

    /// Maps the legacy numeric codes: 0 absolute, 1 max, 2 min.
    pub fn from_code(code: u8) -> Result<Self, FnetError> {
        match code {
            0 => Ok(PeakPolicy::Absolute),
            1 => Ok(PeakPolicy::Max),
            2 => Ok(PeakPolicy::Min),
            other => Err(FnetError::Dispatch(
                ErrorInfo::new("unknown_peak_policy", format!("peak policy code {other}"))
                    .with_hint("use 0 (absolute), 1 (max) or 2 (min)"),
            )),
        }
    }
}

impl fmt::Display for PeakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeakPolicy {
    type Err = FnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeakPolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s.trim())
            .ok_or_else(|| {
                FnetError::Dispatch(
                    ErrorInfo::new("unknown_peak_policy", format!("unknown peak policy '{s}'"))
                        .with_hint("use one of: absolute, max, min"),
                )
            })
    }
}

/// Peak of one statistic for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Peak {
    /// Peak of a time series together with the time it first occurs.
    Timed {
        /// Time of the first occurrence of the peak value.
        time: f64,
        /// Peak value.
        value: f64,
    },
    /// Value of a statistic without a time axis.
    Scalar(f64),
}

impl Peak {
    /// The peak value regardless of shape.
    pub fn value(&self) -> f64 {
        match self {
            Peak::Timed { value, .. } | Peak::Scalar(value) => *value,
        }
    }

    /// The time of the peak, when there is one.
    pub fn time(&self) -> Option<f64> {
        match self {
            Peak::Timed { time, .. } => Some(*time),
            Peak::Scalar(_) => None,
        }
    }
}

// First index whose value beats every earlier one; NaN never wins.
fn extreme_index(values: &[f64], better: fn(f64, f64) -> bool) -> usize {
    let mut best: Option<usize> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some(current) if !better(value, values[current]) => {}
            _ => best = Some(idx),
        }
    }
    best.unwrap_or(0)
}

/// Reduces `values` to a single peak under `policy`.
///
/// With `times`, the result is [`Peak::Timed`] carrying the time at the first
/// index holding the chosen value; `times` must have the same length as
/// `values`.
pub fn extract_peak(
    values: &[f64],
    times: Option<&[f64]>,
    policy: PeakPolicy,
) -> Result<Peak, FnetError> {
    if values.is_empty() {
        return Err(FnetError::Shape(ErrorInfo::new(
            "empty_series",
            "cannot take the peak of an empty series",
        )));
    }
    if let Some(times) = times {
        if times.len() != values.len() {
            return Err(FnetError::Shape(
                ErrorInfo::new(
                    "length_mismatch",
                    format!(
                        "{} times supplied for {} values",
                        times.len(),
                        values.len()
                    ),
                )
                .with_context("times", times.len().to_string())
                .with_context("values", values.len().to_string()),
            ));
        }
    }

    let max_idx = extreme_index(values, |a, b| a > b);
    let min_idx = extreme_index(values, |a, b| a < b);
    let idx = match policy {
        PeakPolicy::Absolute => {
            if values[max_idx].abs() > values[min_idx].abs() {
                max_idx
            } else {
                min_idx
            }
        }
        PeakPolicy::Max => max_idx,
        PeakPolicy::Min => min_idx,
    };

    Ok(match times {
        Some(times) => Peak::Timed {
            time: times[idx],
            value: values[idx],
        },
        None => Peak::Scalar(values[idx]),
    })
}

/// Peak of a computed statistic: timed for series, the value itself for scalars.
pub fn peak_of(statistic: &Statistic, policy: PeakPolicy) -> Result<Peak, FnetError> {
    match statistic {
        Statistic::Series(series) => {
            extract_peak(&series.values, Some(&series.times), policy)
        }
        Statistic::Scalar(value) => Ok(Peak::Scalar(*value)),
    }
}
