use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Rows reported at one simulation time, stored column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlice {
    /// Simulation time of the block.
    pub time: f64,
    /// Frame counter announced by the most recent `% frame` marker, if any.
    pub frame: Option<u64>,
    /// Row offsets at which `% fiber` sections begin.
    pub fiber_starts: Vec<usize>,
    rows: usize,
    columns: Vec<Vec<f64>>,
}

impl TimeSlice {
    pub(crate) fn new(
        time: f64,
        frame: Option<u64>,
        fiber_starts: Vec<usize>,
        rows: usize,
        columns: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            time,
            frame,
            fiber_starts,
            rows,
            columns,
        }
    }

    /// Number of model points (or fibers) reported at this time.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// True when the block carried no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of stored columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Values of a single field across all rows.
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Row ranges belonging to each fiber section.
    ///
    /// A slice without fiber markers is a single section covering every row.
    pub fn fiber_ranges(&self) -> Vec<Range<usize>> {
        if self.rows == 0 {
            return Vec::new();
        }
        let mut starts: Vec<usize> = self
            .fiber_starts
            .iter()
            .copied()
            .filter(|&start| start < self.rows)
            .collect();
        if starts.first() != Some(&0) {
            starts.insert(0, 0);
        }
        starts.dedup();
        starts
            .iter()
            .enumerate()
            .map(|(idx, &start)| {
                let end = starts.get(idx + 1).copied().unwrap_or(self.rows);
                start..end
            })
            .collect()
    }
}

/// Time-ordered report table produced by [`crate::ReportParser`].
///
/// Times are strictly increasing and every non-empty slice has the same width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    source: String,
    width: usize,
    slices: Vec<TimeSlice>,
}

impl TimeSeriesTable {
    pub(crate) fn new(source: String, width: usize, slices: Vec<TimeSlice>) -> Self {
        Self {
            source,
            width,
            slices,
        }
    }

    /// Label of the report the table was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column count shared by every row in the table (zero when no rows were seen).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of time keys.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True when the report contained no time blocks.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Time slices in increasing time order.
    pub fn slices(&self) -> &[TimeSlice] {
        &self.slices
    }

    /// The time axis of the table.
    pub fn times(&self) -> Vec<f64> {
        self.slices.iter().map(|slice| slice.time).collect()
    }

    /// Looks up the slice recorded at exactly `time`.
    pub fn at(&self, time: f64) -> Option<&TimeSlice> {
        self.slices
            .binary_search_by(|slice| slice.time.total_cmp(&time))
            .ok()
            .map(|idx| &self.slices[idx])
    }
}
