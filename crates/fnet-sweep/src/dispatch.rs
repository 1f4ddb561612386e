use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crossbeam_channel::Receiver;
use fnet_core::errors::{ErrorInfo, FnetError};
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::plan::{load_plan, SweepPlan};
use crate::report::SweepReport;

/// Options governing sweep execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOpts {
    /// Number of workers; 1 processes directories serially in input order.
    pub workers: usize,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl RunOpts {
    /// Options running `workers` jobs at a time.
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }
}

/// Runs `job` once per directory and returns the outputs in input order.
///
/// With more than one worker the `(index, directory)` pairs are queued on a
/// channel that a pool of `min(workers, directories)` threads drains; each
/// output is stored at the index it was claimed with, so completion order
/// never leaks into the result. The first failure stops workers from claiming
/// further directories, and the error of the lowest failing index is returned
/// tagged with its `index` and `dir`, exactly as a serial run would report it.
pub fn run_indexed<T, F>(dirs: &[PathBuf], opts: &RunOpts, job: F) -> Result<Vec<T>, FnetError>
where
    T: Send + Sync,
    F: Fn(usize, &Path) -> Result<T, FnetError> + Sync,
{
    if opts.workers == 0 {
        return Err(FnetError::Dispatch(
            ErrorInfo::new("zero_workers", "at least one worker is required")
                .with_hint("set workers to 1 for a serial run"),
        ));
    }
    if dirs.is_empty() {
        return Err(FnetError::Config(ErrorInfo::new(
            "empty_sweep",
            "no run directories to aggregate",
        )));
    }

    let workers = opts.workers.min(dirs.len());
    if workers == 1 {
        let mut outputs = Vec::with_capacity(dirs.len());
        for (index, dir) in dirs.iter().enumerate() {
            debug!(index, dir = %dir.display(), "processing run directory");
            let output = job(index, dir).map_err(|err| {
                warn!(index, dir = %dir.display(), error = %err, "run directory failed");
                tag_failure(err, index, dir)
            })?;
            debug!(index, "run directory done");
            outputs.push(output);
        }
        return Ok(outputs);
    }

    let (tx, rx) = crossbeam_channel::bounded::<(usize, &Path)>(dirs.len());
    for (index, dir) in dirs.iter().enumerate() {
        tx.send((index, dir.as_path())).map_err(|_| {
            FnetError::Dispatch(ErrorInfo::new("queue_closed", "work queue closed early"))
        })?;
    }
    drop(tx);

    let slots: Vec<OnceLock<Result<T, FnetError>>> = dirs.iter().map(|_| OnceLock::new()).collect();
    let failed = AtomicBool::new(false);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("fnet-worker-{idx}"))
        .build()
        .map_err(|err| FnetError::Dispatch(ErrorInfo::new("thread_pool", err.to_string())))?;

    pool.scope(|scope| {
        for worker in 0..workers {
            let rx = rx.clone();
            let slots = &slots;
            let failed = &failed;
            let job = &job;
            scope.spawn(move |_| drain(worker, rx, slots, failed, job));
        }
    });

    let mut outputs = Vec::with_capacity(dirs.len());
    for (index, slot) in slots.into_iter().enumerate() {
        match slot.into_inner() {
            Some(Ok(output)) => outputs.push(output),
            Some(Err(err)) => return Err(tag_failure(err, index, &dirs[index])),
            // Claims are FIFO, so an unclaimed slot always follows a failed one.
            None => {
                return Err(FnetError::Dispatch(
                    ErrorInfo::new("job_not_run", "directory was never processed")
                        .with_context("index", index.to_string())
                        .with_context("dir", dirs[index].display().to_string()),
                ))
            }
        }
    }
    Ok(outputs)
}

fn drain<T, F>(
    worker: usize,
    rx: Receiver<(usize, &Path)>,
    slots: &[OnceLock<Result<T, FnetError>>],
    failed: &AtomicBool,
    job: &F,
) where
    F: Fn(usize, &Path) -> Result<T, FnetError>,
{
    while !failed.load(Ordering::Acquire) {
        let Ok((index, dir)) = rx.recv() else {
            break;
        };
        debug!(worker, index, dir = %dir.display(), "processing run directory");
        let result = job(index, dir);
        match &result {
            Ok(_) => debug!(worker, index, "run directory done"),
            Err(err) => {
                warn!(worker, index, dir = %dir.display(), error = %err, "run directory failed");
                failed.store(true, Ordering::Release);
            }
        }
        if slots[index].set(result).is_err() {
            warn!(worker, index, "result slot written twice");
        }
    }
}

fn tag_failure(err: FnetError, index: usize, dir: &Path) -> FnetError {
    err.with_context("index", index.to_string())
        .with_context("dir", dir.display().to_string())
}

/// Executes a sweep plan: reads every run's parameters and aggregates the
/// requested peaks.
pub fn run_sweep(plan: &SweepPlan, opts: &RunOpts) -> Result<SweepReport, FnetError> {
    let requests = plan.requests()?;
    let directories = plan.run_directories()?;
    info!(
        directories = directories.len(),
        workers = opts.workers,
        statistics = requests.len(),
        "starting sweep"
    );
    let aggregator = Aggregator::new(directories, plan.report_source(), opts.clone())?
        .with_config_file(plan.config_file.clone());
    let parameters = aggregator.parameters(plan.numparams)?;
    let peaks = aggregator.peaks(&requests)?;
    info!(cached = aggregator.cache().len(), "sweep complete");
    Ok(SweepReport::new(
        plan.plan_hash()?,
        aggregator.directories(),
        parameters,
        peaks,
    ))
}

/// Loads a plan from disk and executes it with the plan's own worker count.
pub fn run_sweep_from_path(plan_path: &Path) -> Result<SweepReport, FnetError> {
    let plan = load_plan(plan_path)?;
    run_sweep(&plan, &plan.run_opts())
}
