use std::path::{Path, PathBuf};
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fnet_core::{FnetError, ReportCommand};
use fnet_report::ReportSource;
use fnet_stats::expand_requests;
use fnet_sweep::{Aggregator, RunOpts};

const RUNS: usize = 32;
const TIMES: usize = 200;
const POINTS: usize = 64;

struct SyntheticNetwork {
    fiber_force: String,
    fiber: String,
}

impl SyntheticNetwork {
    fn new() -> Self {
        let mut fiber_force = String::new();
        let mut fiber = String::new();
        for t in 0..TIMES {
            fiber_force.push_str(&format!("% time {t}\n"));
            fiber.push_str(&format!("% time {t}\n"));
            let shrink = 1.0 - t as f64 / (2 * TIMES) as f64;
            for p in 0..POINTS {
                let angle = p as f64 * std::f64::consts::TAU / POINTS as f64;
                if p % 8 == 0 {
                    fiber_force.push_str(&format!("%   fiber f{}:0001\n", p / 8));
                }
                fiber_force.push_str(&format!(
                    " m{p} {:.4} {:.4} {:.4} {:.4} {:.4}\n",
                    shrink * angle.cos(),
                    shrink * angle.sin(),
                    -angle.cos(),
                    -angle.sin(),
                    t as f64 * 0.01
                ));
            }
            for f in 0..POINTS / 8 {
                fiber.push_str(&format!(" f{f} 0 2.0 0 0 0 0 {:.4}\n", 2.0 * shrink));
            }
        }
        Self { fiber_force, fiber }
    }
}

impl ReportSource for SyntheticNetwork {
    fn report(&self, command: ReportCommand, _dir: &Path) -> Result<String, FnetError> {
        Ok(match command {
            ReportCommand::FiberForce => self.fiber_force.clone(),
            ReportCommand::Fiber => self.fiber.clone(),
        })
    }
}

fn bench_aggregate(c: &mut Criterion) {
    let source: Arc<dyn ReportSource> = Arc::new(SyntheticNetwork::new());
    let dirs: Vec<PathBuf> = (0..RUNS).map(|k| PathBuf::from(format!("run{k}"))).collect();
    let requests = expand_requests([("all", None)]).expect("requests");

    let mut group = c.benchmark_group("aggregate_throughput");
    for workers in [1, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let aggregator =
                    Aggregator::new(dirs.clone(), Arc::clone(&source), RunOpts::with_workers(workers))
                        .expect("aggregator");
                aggregator.peaks(&requests).expect("peaks")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
