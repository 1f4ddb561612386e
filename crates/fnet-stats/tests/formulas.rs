use fnet_core::{FnetError, ReportCommand};
use fnet_report::parse_report;
use fnet_stats::formulas::{
    contraction_rate, effective_length, fiber_force, force, radius, radius_of_gyration, tension,
    tension_integral, total_force,
};
use fnet_stats::TimeSeries;
use proptest::prelude::*;

const FORCES: &str = "\
% time 0
%   fiber f1
 a  1.0  0.0   3.0  4.0   2.0
 b -1.0  0.0  -3.0  0.0   4.0
% time 2
%   fiber f1
 a  2.0  0.0   1.0  0.0   1.0
%   fiber f2
 b -2.0  0.0   0.0  1.0   1.0
";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn radius_matches_centroid_spread() {
    let table = parse_report(ReportCommand::FiberForce, FORCES, "inline").expect("parse");
    let series = radius(&table).expect("radius");
    assert_eq!(series.times, vec![0.0, 2.0]);
    assert!(close(series.values[0], 1.0));
    assert!(close(series.values[1], 2.0));
}

#[test]
fn force_variants_are_distinct() {
    let table = parse_report(ReportCommand::FiberForce, FORCES, "inline").expect("parse");
    // |(3,4)| = 5 and |(-3,0)| = 3 at t=0; unit vectors at t=2.
    assert_eq!(force(&table).expect("force").values, vec![4.0, 1.0]);
    let total = total_force(&table).expect("total").values;
    assert!(close(total[0], 4.0));
    assert!(close(total[1], 2f64.sqrt()));
    // One fiber at t=0, two fibers of unit force at t=2.
    let per_fiber = fiber_force(&table).expect("fiber force").values;
    assert!(close(per_fiber[0], 4.0));
    assert!(close(per_fiber[1], 2.0));
}

#[test]
fn tension_is_mean_over_points() {
    let table = parse_report(ReportCommand::FiberForce, FORCES, "inline").expect("parse");
    assert_eq!(tension(&table).expect("tension").values, vec![3.0, 1.0]);
}

#[test]
fn contraction_rate_is_forward_difference_aligned_to_later_times() {
    let radius = TimeSeries::new(vec![0.0, 1.0, 3.0, 4.0], vec![10.0, 8.0, 7.0, 7.5]);
    let rate = contraction_rate(&radius).expect("rate");
    assert_eq!(rate.len(), radius.len() - 1);
    assert_eq!(rate.times, vec![1.0, 3.0, 4.0]);
    for i in 0..rate.len() {
        let expected =
            (radius.values[i + 1] - radius.values[i]) / (radius.times[i + 1] - radius.times[i]);
        assert!(close(rate.values[i], expected));
    }
}

#[test]
fn contraction_rate_of_a_single_sample_is_a_data_error() {
    let err = contraction_rate(&TimeSeries::new(vec![0.0], vec![1.0])).unwrap_err();
    assert!(matches!(err, FnetError::Statistic(_)));
    assert_eq!(err.info().code, "too_few_samples");
    assert!(err.is_data_error());
}

#[test]
fn tension_integral_uses_first_spacing() {
    let constant = TimeSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![5.0, 5.0, 5.0, 5.0]);
    assert_eq!(tension_integral(&constant).expect("integral"), 15.0);

    // Non-uniform sampling keeps the first step: (1 + 2) * 0.5.
    let uneven = TimeSeries::new(vec![0.0, 0.5, 3.0], vec![1.0, 2.0, 100.0]);
    assert_eq!(tension_integral(&uneven).expect("integral"), 1.5);

    let err = tension_integral(&TimeSeries::new(vec![0.0], vec![1.0])).unwrap_err();
    assert_eq!(err.info().code, "too_few_samples");
}

#[test]
fn effective_length_averages_ratios_over_fibers() {
    let text = "\
% time 0
 f1  1  2.0  0 0 0 0  1.0
 f2  1  4.0  0 0 0 0  4.0
% time 1
 f1  1  2.0  0 0 0 0  2.0
 f2  1  4.0  0 0 0 0  2.0
";
    let table = parse_report(ReportCommand::Fiber, text, "inline").expect("parse");
    let series = effective_length(&table).expect("effective length");
    assert_eq!(series.values, vec![0.75, 0.75]);

    let degenerate = "% time 0\n f1 1 0.0 0 0 0 0 1.0\n";
    let table = parse_report(ReportCommand::Fiber, degenerate, "inline").expect("parse");
    let err = effective_length(&table).unwrap_err();
    assert_eq!(err.info().code, "zero_contour_length");
}

#[test]
fn empty_slice_is_a_statistic_error() {
    let text = "% time 0\n% time 1\n a 1 2 3 4 5\n";
    let table = parse_report(ReportCommand::FiberForce, text, "inline").expect("parse");
    let err = radius(&table).unwrap_err();
    assert_eq!(err.info().code, "empty_slice");
    assert_eq!(err.info().context.get("time").map(String::as_str), Some("0"));
    assert!(err.is_data_error());
}

fn points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..40)
}

proptest! {
    #[test]
    fn radius_is_translation_invariant(pts in points(), dx in -1.0e3f64..1.0e3, dy in -1.0e3f64..1.0e3) {
        let (x, y): (Vec<f64>, Vec<f64>) = pts.iter().copied().unzip();
        let shifted_x: Vec<f64> = x.iter().map(|v| v + dx).collect();
        let shifted_y: Vec<f64> = y.iter().map(|v| v + dy).collect();
        let before = radius_of_gyration(&x, &y);
        let after = radius_of_gyration(&shifted_x, &shifted_y);
        prop_assert!((before - after).abs() <= 1e-8 * (1.0 + before));
    }

    #[test]
    fn radius_is_non_negative(pts in points()) {
        let (x, y): (Vec<f64>, Vec<f64>) = pts.iter().copied().unzip();
        prop_assert!(radius_of_gyration(&x, &y) >= 0.0);
    }
}
