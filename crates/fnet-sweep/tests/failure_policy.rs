mod common;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{run_dirs, SyntheticReports};
use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use fnet_report::ReportSource;
use fnet_stats::{PeakPolicy, StatRequest, StatisticName};
use fnet_sweep::{run_indexed, Aggregator, RunOpts};

const RADIUS: [StatRequest; 1] = [StatRequest::new(StatisticName::Radius, PeakPolicy::Min)];

fn failing_run(workers: usize) -> FnetError {
    let source = SyntheticReports::new()
        .failing_on(&[2, 4])
        .with_delay(|k| if k == 4 { 0 } else { 5 });
    Aggregator::new(run_dirs(6), Arc::new(source), RunOpts::with_workers(workers))
        .expect("aggregator")
        .peaks(&RADIUS)
        .expect_err("runs 2 and 4 fail")
}

#[test]
fn lowest_failing_index_is_reported() {
    let serial = failing_run(1);
    let parallel = failing_run(3);

    for err in [&serial, &parallel] {
        assert!(matches!(err, FnetError::Report(_)));
        assert!(err.is_data_error());
        let context = &err.info().context;
        assert_eq!(context.get("index").map(String::as_str), Some("2"));
        assert_eq!(context.get("dir").map(String::as_str), Some("runs/run2"));
        assert_eq!(context.get("statistic").map(String::as_str), Some("radius"));
    }
    assert_eq!(serial, parallel);
}

#[test]
fn failure_stops_further_claims() {
    let dirs: Vec<PathBuf> = run_dirs(64);
    let processed = AtomicUsize::new(0);
    let err = run_indexed(&dirs, &RunOpts::default(), |index, _| {
        processed.fetch_add(1, Ordering::SeqCst);
        if index == 3 {
            Err(FnetError::Statistic(ErrorInfo::new("empty_slice", "no rows")))
        } else {
            Ok(index)
        }
    })
    .expect_err("index 3 fails");
    assert_eq!(err.info().context.get("index").map(String::as_str), Some("3"));
    assert_eq!(processed.load(Ordering::SeqCst), 4);
}

#[test]
fn run_indexed_preserves_order() {
    let dirs = run_dirs(20);
    let out = run_indexed(&dirs, &RunOpts::with_workers(4), |index, dir| {
        std::thread::sleep(std::time::Duration::from_millis((20 - index as u64) % 7));
        Ok((index, dir.to_path_buf()))
    })
    .expect("all succeed");
    let expected: Vec<(usize, PathBuf)> = dirs.iter().cloned().enumerate().collect();
    assert_eq!(out, expected);
}

#[test]
fn zero_workers_and_empty_sweeps_are_rejected() {
    let zero = run_indexed(&run_dirs(2), &RunOpts::with_workers(0), |index, _| Ok(index))
        .expect_err("zero workers");
    assert!(matches!(zero, FnetError::Dispatch(ref info) if info.code == "zero_workers"));

    let empty = run_indexed(&[], &RunOpts::with_workers(2), |index, _| Ok(index))
        .expect_err("no directories");
    assert!(matches!(empty, FnetError::Config(ref info) if info.code == "empty_sweep"));

    let aggregator = Aggregator::new(Vec::new(), Arc::new(SyntheticReports::new()), RunOpts::default());
    assert!(aggregator.is_err());
}

#[test]
fn programming_errors_surface_before_any_report() {
    let source = Arc::new(SyntheticReports::new());
    let aggregator =
        Aggregator::new(run_dirs(3), source.clone(), RunOpts::with_workers(2)).expect("aggregator");
    let err = aggregator.peaks(&[]).expect_err("nothing requested");
    assert!(!err.is_data_error());
    assert_eq!(source.total_calls(), 0);
}

struct SingleBlock;

impl ReportSource for SingleBlock {
    fn report(&self, _command: ReportCommand, _dir: &Path) -> Result<String, FnetError> {
        Ok("% time 0\n m1 1 0 1 0 2\n m2 -1 0 -1 0 2\n".to_string())
    }
}

#[test]
fn one_time_block_is_too_short_for_derived_statistics() {
    for statistic in [StatisticName::ContractionRate, StatisticName::TensionIntegral] {
        let aggregator = Aggregator::new(run_dirs(2), Arc::new(SingleBlock), RunOpts::with_workers(2))
            .expect("aggregator");
        let err = aggregator
            .peak(statistic, PeakPolicy::Absolute)
            .expect_err("one sample");
        assert!(matches!(err, FnetError::Statistic(ref info) if info.code == "too_few_samples"));
        assert!(err.is_data_error());
        assert_eq!(err.info().context.get("index").map(String::as_str), Some("0"));
        assert_eq!(
            err.info().context.get("statistic").map(String::as_str),
            Some(statistic.as_str())
        );
    }
}
