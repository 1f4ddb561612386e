use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use fnet_report::{load_table, read_params, ParameterSet, ReportSource, TimeSeriesTable, CONFIG_FILE};
use fnet_stats::{peak_of, Extractor, Peak, PeakPolicy, StatRequest, Statistic, StatisticName};
use tracing::debug;

use crate::cache::StatCache;
use crate::dispatch::{run_indexed, RunOpts};
use crate::result::{AggregationResult, PeakColumn};

/// Aggregates statistics over an ordered list of run directories.
///
/// Every output is aligned with [`Aggregator::directories`]: position `i`
/// always describes directory `i`, whatever the worker count.
pub struct Aggregator {
    directories: Vec<PathBuf>,
    source: Arc<dyn ReportSource>,
    opts: RunOpts,
    config_file: String,
    cache: StatCache,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("directories", &self.directories)
            .field("opts", &self.opts)
            .field("config_file", &self.config_file)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Aggregator {
    /// Creates an aggregator over `directories`, fetching reports from `source`.
    pub fn new(
        directories: Vec<PathBuf>,
        source: Arc<dyn ReportSource>,
        opts: RunOpts,
    ) -> Result<Self, FnetError> {
        if opts.workers == 0 {
            return Err(FnetError::Dispatch(
                ErrorInfo::new("zero_workers", "at least one worker is required")
                    .with_hint("set workers to 1 for a serial run"),
            ));
        }
        if directories.is_empty() {
            return Err(FnetError::Config(ErrorInfo::new(
                "empty_sweep",
                "no run directories to aggregate",
            )));
        }
        Ok(Self {
            directories,
            source,
            opts,
            config_file: CONFIG_FILE.to_string(),
            cache: StatCache::default(),
        })
    }

    /// Reads parameters from `config_file` instead of the default config name.
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Run directories in aggregation order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Execution options.
    pub fn opts(&self) -> &RunOpts {
        &self.opts
    }

    /// Statistics computed so far.
    pub fn cache(&self) -> &StatCache {
        &self.cache
    }

    /// Peak of every requested statistic for every directory.
    ///
    /// Each directory fetches every report command it needs at most once and
    /// computes each statistic at most once, derived statistics included.
    pub fn peaks(&self, requests: &[StatRequest]) -> Result<AggregationResult, FnetError> {
        if requests.is_empty() {
            return Err(FnetError::Dispatch(ErrorInfo::new(
                "no_statistics",
                "at least one statistic must be requested",
            )));
        }
        let rows = run_indexed(&self.directories, &self.opts, |_, dir| {
            let mut job = DirectoryJob::new(self, dir);
            requests
                .iter()
                .map(|request| job.peak(request.statistic, request.policy))
                .collect::<Result<Vec<Peak>, FnetError>>()
        })?;
        AggregationResult::from_rows(requests, rows)
    }

    /// Peak of a single statistic across all directories.
    pub fn peak(&self, statistic: StatisticName, policy: PeakPolicy) -> Result<PeakColumn, FnetError> {
        let request = StatRequest::new(statistic, policy);
        let result = self.peaks(&[request])?;
        result.get(statistic).cloned().ok_or_else(|| {
            FnetError::Dispatch(
                ErrorInfo::new("missing_column", "aggregation produced no column")
                    .with_context("statistic", statistic.as_str()),
            )
        })
    }

    /// Full statistic of the `index`-th directory, computed through the cache.
    pub fn series(&self, index: usize, statistic: StatisticName) -> Result<Arc<Statistic>, FnetError> {
        let dir = self.directories.get(index).ok_or_else(|| {
            FnetError::Dispatch(
                ErrorInfo::new(
                    "index_out_of_range",
                    format!("run index {index} exceeds {} directories", self.directories.len()),
                )
                .with_context("index", index.to_string()),
            )
        })?;
        DirectoryJob::new(self, dir)
            .statistic(statistic)
            .map_err(|err| err.with_context("statistic", statistic.as_str()))
            .map_err(|err| {
                err.with_context("index", index.to_string())
                    .with_context("dir", dir.display().to_string())
            })
    }

    /// First `numparams` parameters of every directory, one set per directory.
    pub fn parameter_sets(&self, numparams: usize) -> Result<Vec<ParameterSet>, FnetError> {
        run_indexed(&self.directories, &self.opts, |_, dir| {
            read_params(dir, &self.config_file, numparams)
        })
    }

    /// Parameters transposed to one vector per parameter position.
    ///
    /// `parameters(k)[j][i]` is the `j`-th parameter of directory `i`. With
    /// `numparams == 0` no config file is read.
    pub fn parameters(&self, numparams: usize) -> Result<Vec<Vec<f64>>, FnetError> {
        if numparams == 0 {
            return Ok(Vec::new());
        }
        let sets = self.parameter_sets(numparams)?;
        Ok((0..numparams)
            .map(|position| sets.iter().map(|set| set.values[position]).collect())
            .collect())
    }
}

// Per-directory state: report tables are fetched lazily, once per command.
struct DirectoryJob<'a> {
    aggregator: &'a Aggregator,
    dir: &'a Path,
    tables: HashMap<ReportCommand, Arc<TimeSeriesTable>>,
}

impl<'a> DirectoryJob<'a> {
    fn new(aggregator: &'a Aggregator, dir: &'a Path) -> Self {
        Self {
            aggregator,
            dir,
            tables: HashMap::new(),
        }
    }

    fn table(&mut self, command: ReportCommand) -> Result<Arc<TimeSeriesTable>, FnetError> {
        if let Some(table) = self.tables.get(&command) {
            return Ok(Arc::clone(table));
        }
        debug!(dir = %self.dir.display(), %command, "loading report");
        let table = Arc::new(load_table(
            self.aggregator.source.as_ref(),
            command,
            self.dir,
        )?);
        self.tables.insert(command, Arc::clone(&table));
        Ok(table)
    }

    fn statistic(&mut self, name: StatisticName) -> Result<Arc<Statistic>, FnetError> {
        let aggregator = self.aggregator;
        let cache = &aggregator.cache;
        if let Some(hit) = cache.get(self.dir, name) {
            debug!(dir = %self.dir.display(), statistic = %name, "statistic cache hit");
            return Ok(hit);
        }
        let value = match name.spec().extractor {
            Extractor::Table { command, extract } => {
                let table = self.table(command)?;
                extract(&table)?
            }
            Extractor::Derived { base, derive } => {
                let base = self.statistic(base)?;
                derive(&base)?
            }
        };
        Ok(cache.insert(self.dir, name, value))
    }

    fn peak(&mut self, name: StatisticName, policy: PeakPolicy) -> Result<Peak, FnetError> {
        self.statistic(name)
            .and_then(|statistic| peak_of(&statistic, policy))
            .map_err(|err| err.with_context("statistic", name.as_str()))
    }
}
