//! Report commands understood by the external report binary.

use serde::{Deserialize, Serialize};

/// Field selection passed to the report binary.
///
/// Each command fixes the column layout of the rows it emits once the leading
/// row identifier has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCommand {
    /// `fiber:force`: one row per model point with position, force and tension.
    FiberForce,
    /// `fiber`: one row per fiber with contour and end-to-end lengths.
    Fiber,
}

impl ReportCommand {
    /// Column of the x position in `fiber:force` rows.
    pub const X: usize = 0;
    /// Column of the y position in `fiber:force` rows.
    pub const Y: usize = 1;
    /// Column of the x force component in `fiber:force` rows.
    pub const FX: usize = 2;
    /// Column of the y force component in `fiber:force` rows.
    pub const FY: usize = 3;
    /// Column of the tension in `fiber:force` rows.
    pub const TENSION: usize = 4;
    /// Column of the contour length in `fiber` rows.
    pub const CONTOUR_LENGTH: usize = 1;
    /// Column of the end-to-end distance in `fiber` rows.
    pub const END_TO_END: usize = 6;

    /// Argument handed to the report binary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCommand::FiberForce => "fiber:force",
            ReportCommand::Fiber => "fiber",
        }
    }

    /// Minimum number of numeric columns a row must carry.
    pub fn min_columns(&self) -> usize {
        match self {
            ReportCommand::FiberForce => Self::TENSION + 1,
            ReportCommand::Fiber => Self::END_TO_END + 1,
        }
    }
}

impl std::fmt::Display for ReportCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
