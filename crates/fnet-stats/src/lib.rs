#![deny(missing_docs)]
#![doc = "Derived statistics (radius of gyration, forces, tension, contraction rate, tension integral, effective length) and peak extraction."]

/// Per-slice formulas and whole-table statistic extractors.
pub mod formulas;
/// Peak policies and the peak extractor.
pub mod peak;
/// Closed registry mapping statistic names to extractors.
pub mod registry;
/// Statistic value types.
pub mod series;

pub use peak::{extract_peak, peak_of, Peak, PeakPolicy};
pub use registry::{expand_requests, Extractor, StatRequest, StatisticName, StatisticSpec, REGISTRY};
pub use series::{Statistic, TimeSeries};
