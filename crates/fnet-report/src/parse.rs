use fnet_core::{ErrorInfo, FnetError, ReportCommand};

use crate::table::{TimeSeriesTable, TimeSlice};

fn parse_error(code: &str, message: impl Into<String>, source: &str, line: usize) -> FnetError {
    FnetError::Parse(
        ErrorInfo::new(code, message)
            .with_context("source", source)
            .with_context("line", line.to_string()),
    )
}

/// Parses report text emitted for `command`.
pub fn parse_report(
    command: ReportCommand,
    text: &str,
    source: &str,
) -> Result<TimeSeriesTable, FnetError> {
    ReportParser::for_command(command, source).parse(text)
}

/// Line parser for the marker-delimited report format.
///
/// * `% time <float>` opens a new time block.
/// * `% frame <int>` records the frame counter of the block about to open, or of
///   the open block while it has no rows and no frame yet.
/// * `% fiber <label>` starts a new fiber section inside the open block.
/// * Any other `%` line is a comment, blank lines are skipped.
/// * Every remaining line is a data row: a leading identifier followed by
///   whitespace separated floats.
#[derive(Debug, Clone)]
pub struct ReportParser<'a> {
    source: &'a str,
    min_columns: usize,
}

impl<'a> ReportParser<'a> {
    /// Creates a parser accepting rows of any (consistent) width.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            min_columns: 1,
        }
    }

    /// Creates a parser requiring the column layout of `command`.
    pub fn for_command(command: ReportCommand, source: &'a str) -> Self {
        Self::new(source).min_columns(command.min_columns())
    }

    /// Sets the minimum number of numeric fields a data row must carry.
    pub fn min_columns(mut self, min_columns: usize) -> Self {
        self.min_columns = min_columns.max(1);
        self
    }

    /// Parses the full report text.
    pub fn parse(&self, text: &str) -> Result<TimeSeriesTable, FnetError> {
        let mut slices = Vec::new();
        let mut block: Option<Block> = None;
        let mut pending_frame: Option<u64> = None;
        let mut width: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('%') {
                let comment = comment.trim_start();
                let (keyword, rest) = comment
                    .split_once(char::is_whitespace)
                    .map(|(keyword, rest)| (keyword, rest.trim()))
                    .unwrap_or((comment, ""));
                match keyword {
                    "time" => {
                        let time = self.parse_time(rest, line_no)?;
                        if let Some(open) = block.take() {
                            if time <= open.time {
                                return Err(parse_error(
                                    "non_increasing_time",
                                    format!("time {time} does not follow time {}", open.time),
                                    self.source,
                                    line_no,
                                ));
                            }
                            slices.push(open.finish(width.unwrap_or(0)));
                        }
                        block = Some(Block::open(time, pending_frame.take()));
                    }
                    "frame" => {
                        let frame = self.parse_frame(rest, line_no)?;
                        match block.as_mut() {
                            Some(open) if open.rows.is_empty() && open.frame.is_none() => {
                                open.frame = Some(frame);
                            }
                            _ => pending_frame = Some(frame),
                        }
                    }
                    "fiber" => {
                        if let Some(open) = block.as_mut() {
                            let start = open.rows.len();
                            if open.fiber_starts.last() != Some(&start) {
                                open.fiber_starts.push(start);
                            }
                        }
                    }
                    _ => {}
                }
                continue;
            }

            let Some(open) = block.as_mut() else {
                return Err(parse_error(
                    "missing_time_marker",
                    format!("data row before any '% time' marker: '{line}'"),
                    self.source,
                    line_no,
                ));
            };
            let fields = self.parse_row(line, line_no)?;
            match width {
                None => width = Some(fields.len()),
                Some(expected) if expected != fields.len() => {
                    return Err(parse_error(
                        "inconsistent_columns",
                        format!(
                            "row has {} fields but earlier rows have {expected}: '{line}'",
                            fields.len()
                        ),
                        self.source,
                        line_no,
                    ));
                }
                Some(_) => {}
            }
            open.rows.push(fields);
        }

        // The last block has no closing marker.
        if let Some(open) = block.take() {
            slices.push(open.finish(width.unwrap_or(0)));
        }

        Ok(TimeSeriesTable::new(
            self.source.to_string(),
            width.unwrap_or(0),
            slices,
        ))
    }

    fn parse_time(&self, rest: &str, line_no: usize) -> Result<f64, FnetError> {
        let token = rest.split_whitespace().next().unwrap_or("");
        match token.parse::<f64>() {
            Ok(time) if time.is_finite() => Ok(time),
            _ => Err(parse_error(
                "bad_time_marker",
                format!("could not read a time from '% time {rest}'"),
                self.source,
                line_no,
            )),
        }
    }

    fn parse_frame(&self, rest: &str, line_no: usize) -> Result<u64, FnetError> {
        let token = rest.split_whitespace().next().unwrap_or("");
        token.parse::<u64>().map_err(|_| {
            parse_error(
                "bad_frame_marker",
                format!("could not read a frame counter from '% frame {rest}'"),
                self.source,
                line_no,
            )
        })
    }

    fn parse_row(&self, line: &str, line_no: usize) -> Result<Vec<f64>, FnetError> {
        // Spacing between fields is irregular; the identifier is not numeric data.
        let fields = line
            .split_whitespace()
            .skip(1)
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    parse_error(
                        "non_numeric_field",
                        format!("could not parse '{token}' as a number in '{line}'"),
                        self.source,
                        line_no,
                    )
                })
            })
            .collect::<Result<Vec<f64>, FnetError>>()?;
        if fields.len() < self.min_columns {
            return Err(parse_error(
                "short_row",
                format!(
                    "row has {} fields, expected at least {}: '{line}'",
                    fields.len(),
                    self.min_columns
                ),
                self.source,
                line_no,
            ));
        }
        Ok(fields)
    }
}

struct Block {
    time: f64,
    frame: Option<u64>,
    fiber_starts: Vec<usize>,
    rows: Vec<Vec<f64>>,
}

impl Block {
    fn open(time: f64, frame: Option<u64>) -> Self {
        Self {
            time,
            frame,
            fiber_starts: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn finish(self, width: usize) -> TimeSlice {
        let rows = self.rows.len();
        let columns = transpose(&self.rows, width);
        TimeSlice::new(self.time, self.frame, self.fiber_starts, rows, columns)
    }
}

fn transpose(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    let mut columns = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(*value);
        }
    }
    columns
}
