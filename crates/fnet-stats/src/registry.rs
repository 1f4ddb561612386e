use std::fmt;
use std::str::FromStr;

use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use fnet_report::TimeSeriesTable;
use serde::{Deserialize, Serialize};

use crate::formulas;
use crate::peak::PeakPolicy;
use crate::series::{Statistic, TimeSeries};

/// Closed set of statistics the extractor knows how to compute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StatisticName {
    /// Radius of gyration of all model points.
    Radius = 0,
    /// Mean per-point force magnitude.
    Force = 1,
    /// Magnitude of the summed force vector.
    TotalForce = 2,
    /// Sum over fibers of each fiber's summed force magnitude.
    FiberForce = 3,
    /// Mean tension over model points.
    Tension = 4,
    /// Time derivative of the radius of gyration.
    ContractionRate = 5,
    /// Time integral of the mean tension.
    TensionIntegral = 6,
    /// Mean end-to-end over contour length ratio of fibers.
    EffectiveLength = 7,
}

/// How a statistic is obtained.
#[derive(Clone, Copy)]
pub enum Extractor {
    /// Computed directly from the table produced by a report command.
    Table {
        /// Report command whose table feeds the extractor.
        command: ReportCommand,
        /// Extractor function.
        extract: fn(&TimeSeriesTable) -> Result<Statistic, FnetError>,
    },
    /// Computed from another statistic.
    Derived {
        /// Statistic the derivation consumes.
        base: StatisticName,
        /// Derivation function.
        derive: fn(&Statistic) -> Result<Statistic, FnetError>,
    },
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extractor::Table { command, .. } => {
                f.debug_struct("Table").field("command", command).finish()
            }
            Extractor::Derived { base, .. } => {
                f.debug_struct("Derived").field("base", base).finish()
            }
        }
    }
}

/// Registry entry for one statistic.
#[derive(Debug, Clone, Copy)]
pub struct StatisticSpec {
    /// Statistic identifier.
    pub name: StatisticName,
    /// Name used in plans, reports and on the command line.
    pub key: &'static str,
    /// Extraction recipe.
    pub extractor: Extractor,
}

/// Every statistic, indexed by its discriminant.
pub static REGISTRY: [StatisticSpec; 8] = [
    StatisticSpec {
        name: StatisticName::Radius,
        key: "radius",
        extractor: Extractor::Table {
            command: ReportCommand::FiberForce,
            extract: radius,
        },
    },
    StatisticSpec {
        name: StatisticName::Force,
        key: "force",
        extractor: Extractor::Table {
            command: ReportCommand::FiberForce,
            extract: force,
        },
    },
    StatisticSpec {
        name: StatisticName::TotalForce,
        key: "total_force",
        extractor: Extractor::Table {
            command: ReportCommand::FiberForce,
            extract: total_force,
        },
    },
    StatisticSpec {
        name: StatisticName::FiberForce,
        key: "fiber_force",
        extractor: Extractor::Table {
            command: ReportCommand::FiberForce,
            extract: fiber_force,
        },
    },
    StatisticSpec {
        name: StatisticName::Tension,
        key: "tension",
        extractor: Extractor::Table {
            command: ReportCommand::FiberForce,
            extract: tension,
        },
    },
    StatisticSpec {
        name: StatisticName::ContractionRate,
        key: "contraction_rate",
        extractor: Extractor::Derived {
            base: StatisticName::Radius,
            derive: contraction_rate,
        },
    },
    StatisticSpec {
        name: StatisticName::TensionIntegral,
        key: "tension_integral",
        extractor: Extractor::Derived {
            base: StatisticName::Tension,
            derive: tension_integral,
        },
    },
    StatisticSpec {
        name: StatisticName::EffectiveLength,
        key: "effective_length",
        extractor: Extractor::Table {
            command: ReportCommand::Fiber,
            extract: effective_length,
        },
    },
];

fn radius(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::radius(table).map(Statistic::Series)
}

fn force(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::force(table).map(Statistic::Series)
}

fn total_force(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::total_force(table).map(Statistic::Series)
}

fn fiber_force(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::fiber_force(table).map(Statistic::Series)
}

fn tension(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::tension(table).map(Statistic::Series)
}

fn effective_length(table: &TimeSeriesTable) -> Result<Statistic, FnetError> {
    formulas::effective_length(table).map(Statistic::Series)
}

fn base_series<'s>(base: &'s Statistic, wanted: &str) -> Result<&'s TimeSeries, FnetError> {
    base.as_series().ok_or_else(|| {
        FnetError::Dispatch(ErrorInfo::new(
            "base_not_series",
            format!("{wanted} must be derived from a time series"),
        ))
    })
}

fn contraction_rate(radius: &Statistic) -> Result<Statistic, FnetError> {
    let series = base_series(radius, "contraction_rate")?;
    formulas::contraction_rate(series).map(Statistic::Series)
}

fn tension_integral(tension: &Statistic) -> Result<Statistic, FnetError> {
    let series = base_series(tension, "tension_integral")?;
    formulas::tension_integral(series).map(Statistic::Scalar)
}

impl StatisticName {
    /// Every statistic, in registry order.
    pub const ALL: [StatisticName; 8] = [
        StatisticName::Radius,
        StatisticName::Force,
        StatisticName::TotalForce,
        StatisticName::FiberForce,
        StatisticName::Tension,
        StatisticName::ContractionRate,
        StatisticName::TensionIntegral,
        StatisticName::EffectiveLength,
    ];

    /// Registry entry of this statistic.
    pub fn spec(&self) -> &'static StatisticSpec {
        &REGISTRY[*self as usize]
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        self.spec().key
    }

    /// Whether peaks of this statistic carry a time.
    pub fn is_timed(&self) -> bool {
        !matches!(self, StatisticName::TensionIntegral)
    }
}

impl fmt::Display for StatisticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn known_names() -> String {
    let mut names: Vec<&str> = REGISTRY.iter().map(|spec| spec.key).collect();
    names.extend(BUNDLES.iter().map(|(bundle, _)| *bundle));
    names.join(", ")
}

fn unknown_statistic(name: &str) -> FnetError {
    FnetError::Dispatch(
        ErrorInfo::new("unknown_statistic", format!("unknown statistic '{name}'"))
            .with_context("statistic", name)
            .with_hint(format!("known statistics: {}", known_names())),
    )
}

impl FromStr for StatisticName {
    type Err = FnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        REGISTRY
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.name)
            .ok_or_else(|| unknown_statistic(key))
    }
}

/// One statistic to aggregate and the policy used to pick its peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRequest {
    /// Statistic to extract.
    pub statistic: StatisticName,
    /// Peak policy; ignored for statistics without a time axis.
    #[serde(default)]
    pub policy: PeakPolicy,
}

impl StatRequest {
    /// Creates a request.
    pub const fn new(statistic: StatisticName, policy: PeakPolicy) -> Self {
        Self { statistic, policy }
    }
}

const MAINSTATS: &[StatRequest] = &[
    StatRequest::new(StatisticName::Radius, PeakPolicy::Min),
    StatRequest::new(StatisticName::Tension, PeakPolicy::Absolute),
    StatRequest::new(StatisticName::Force, PeakPolicy::Max),
];

const ALL_STATS: &[StatRequest] = &[
    StatRequest::new(StatisticName::Radius, PeakPolicy::Min),
    StatRequest::new(StatisticName::Tension, PeakPolicy::Absolute),
    StatRequest::new(StatisticName::Force, PeakPolicy::Max),
    StatRequest::new(StatisticName::ContractionRate, PeakPolicy::Absolute),
    StatRequest::new(StatisticName::EffectiveLength, PeakPolicy::Min),
    StatRequest::new(StatisticName::TensionIntegral, PeakPolicy::Absolute),
];

const BUNDLES: &[(&str, &[StatRequest])] = &[("mainstats", MAINSTATS), ("all", ALL_STATS)];

/// Resolves `(name, policy)` entries into requests.
///
/// A bundle name (`mainstats`, `all`) expands in place to its fixed
/// statistic/policy pairs and must not carry a policy of its own. Repeated
/// statistics keep their first occurrence.
pub fn expand_requests<'a, I>(entries: I) -> Result<Vec<StatRequest>, FnetError>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut requests: Vec<StatRequest> = Vec::new();
    let mut push = |request: StatRequest| {
        if !requests.iter().any(|r| r.statistic == request.statistic) {
            requests.push(request);
        }
    };
    for (name, policy) in entries {
        let name = name.trim();
        if let Some((_, bundle)) = BUNDLES.iter().find(|(key, _)| *key == name) {
            if let Some(policy) = policy {
                return Err(FnetError::Dispatch(
                    ErrorInfo::new(
                        "bundle_policy",
                        format!("bundle '{name}' fixes its own peak policies"),
                    )
                    .with_context("statistic", name)
                    .with_context("policy", policy),
                ));
            }
            bundle.iter().copied().for_each(&mut push);
            continue;
        }
        let statistic: StatisticName = name.parse()?;
        let policy = match policy {
            Some(policy) => policy.parse()?,
            None => PeakPolicy::default(),
        };
        push(StatRequest::new(statistic, policy));
    }
    if requests.is_empty() {
        return Err(FnetError::Dispatch(ErrorInfo::new(
            "no_statistics",
            "at least one statistic must be requested",
        )));
    }
    Ok(requests)
}
