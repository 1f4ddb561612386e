#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use fnet_report::ReportSource;

/// Run index encoded in a directory name such as `runs/run3`.
pub fn run_index(dir: &Path) -> usize {
    dir.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("run"))
        .and_then(|digits| digits.parse().ok())
        .expect("run directory name")
}

pub fn run_dirs(count: usize) -> Vec<PathBuf> {
    (0..count).map(|k| PathBuf::from(format!("runs/run{k}"))).collect()
}

/// `fiber:force` text for run `k`: two points at `(±r, 0)` with
/// `r = (k + 1) * (3 - t)` for `t = 0, 1, 2`, unit opposing forces and tension `k`.
pub fn fiber_force_text(k: usize) -> String {
    let mut text = String::from("% report fiber:force\n");
    for t in 0..3 {
        let r = (k as f64 + 1.0) * (3.0 - t as f64);
        text.push_str(&format!("% time {t}\n%   fiber f1:0001\n"));
        text.push_str(&format!(" m1 {r} 0 1 0 {k}\n"));
        text.push_str(&format!(" m2 {} 0 -1 0 {k}\n", -r));
    }
    text
}

/// `fiber` text for run `k`: one fiber whose end-to-end is half its contour length.
pub fn fiber_text(k: usize) -> String {
    let mut text = String::from("% report fiber\n");
    for t in 0..3 {
        let length = 10.0 + k as f64;
        text.push_str(&format!("% time {t}\n"));
        text.push_str(&format!(" f1 0 {length} 0 0 0 0 {}\n", length / 2.0));
    }
    text
}

/// In-memory report source that records every invocation.
#[derive(Default)]
pub struct SyntheticReports {
    /// Runs whose `fiber:force` report exits with an error.
    pub failing: BTreeSet<usize>,
    /// Per-run delay, used to scramble completion order.
    pub delay_ms: Option<Box<dyn Fn(usize) -> u64 + Send + Sync>>,
    calls: Mutex<HashMap<(ReportCommand, PathBuf), usize>>,
}

impl SyntheticReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, runs: &[usize]) -> Self {
        self.failing.extend(runs.iter().copied());
        self
    }

    pub fn with_delay(mut self, delay: impl Fn(usize) -> u64 + Send + Sync + 'static) -> Self {
        self.delay_ms = Some(Box::new(delay));
        self
    }

    pub fn calls(&self, command: ReportCommand, dir: &Path) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .get(&(command, dir.to_path_buf()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().expect("calls lock").values().sum()
    }
}

impl ReportSource for SyntheticReports {
    fn report(&self, command: ReportCommand, dir: &Path) -> Result<String, FnetError> {
        *self
            .calls
            .lock()
            .expect("calls lock")
            .entry((command, dir.to_path_buf()))
            .or_default() += 1;
        let k = run_index(dir);
        if let Some(delay) = &self.delay_ms {
            thread::sleep(Duration::from_millis(delay(k)));
        }
        if command == ReportCommand::FiberForce && self.failing.contains(&k) {
            return Err(FnetError::Report(
                ErrorInfo::new("report_exit", format!("run{k} has no frames"))
                    .with_context("dir", dir.display().to_string()),
            ));
        }
        Ok(match command {
            ReportCommand::FiberForce => fiber_force_text(k),
            ReportCommand::Fiber => fiber_text(k),
        })
    }
}
