use serde::{Deserialize, Serialize};

/// A statistic sampled on (a subset of) a report's time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimeSeries {
    /// Sample times.
    pub times: Vec<f64>,
    /// Sample values, one per time.
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Pairs `times` with `values`; callers guarantee equal lengths.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of a statistic extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Time-resolved statistic.
    Series(TimeSeries),
    /// Statistic without a time axis (e.g. the tension integral).
    Scalar(f64),
}

impl Statistic {
    /// Returns the time series, if this statistic has one.
    pub fn as_series(&self) -> Option<&TimeSeries> {
        match self {
            Statistic::Series(series) => Some(series),
            Statistic::Scalar(_) => None,
        }
    }

    /// Returns the scalar value, if this statistic has no time axis.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Statistic::Scalar(value) => Some(*value),
            Statistic::Series(_) => None,
        }
    }
}
