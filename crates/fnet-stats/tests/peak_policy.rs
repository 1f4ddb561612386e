use fnet_core::FnetError;
use fnet_stats::{extract_peak, peak_of, Peak, PeakPolicy, Statistic, TimeSeries};

#[test]
fn policies_on_mixed_signs() {
    let values = [3.0, -5.0, 1.0];
    assert_eq!(
        extract_peak(&values, None, PeakPolicy::Absolute).expect("peak"),
        Peak::Scalar(-5.0)
    );
    assert_eq!(
        extract_peak(&values, None, PeakPolicy::Max).expect("peak"),
        Peak::Scalar(3.0)
    );
    assert_eq!(
        extract_peak(&values, None, PeakPolicy::Min).expect("peak"),
        Peak::Scalar(-5.0)
    );
}

#[test]
fn timed_peak_reports_time_of_value() {
    let peak = extract_peak(&[1.0, 5.0, 2.0], Some(&[0.0, 1.0, 2.0]), PeakPolicy::Max)
        .expect("peak");
    assert_eq!(peak, Peak::Timed { time: 1.0, value: 5.0 });
    assert_eq!(peak.time(), Some(1.0));
    assert_eq!(peak.value(), 5.0);
}

#[test]
fn absolute_ties_prefer_the_minimum() {
    let peak = extract_peak(&[4.0, 0.0, -4.0], Some(&[0.0, 1.0, 2.0]), PeakPolicy::Absolute)
        .expect("peak");
    assert_eq!(peak, Peak::Timed { time: 2.0, value: -4.0 });
}

#[test]
fn first_occurrence_wins() {
    let peak = extract_peak(&[2.0, 7.0, 7.0], Some(&[0.0, 0.5, 1.0]), PeakPolicy::Max)
        .expect("peak");
    assert_eq!(peak, Peak::Timed { time: 0.5, value: 7.0 });
}

#[test]
fn mismatched_lengths_are_shape_errors() {
    let err = extract_peak(&[1.0, 2.0], Some(&[0.0]), PeakPolicy::Max).unwrap_err();
    assert!(matches!(err, FnetError::Shape(_)));
    assert_eq!(err.info().code, "length_mismatch");
    let err = extract_peak(&[], None, PeakPolicy::Max).unwrap_err();
    assert_eq!(err.info().code, "empty_series");
}

#[test]
fn policies_parse_from_names_and_codes() {
    assert_eq!("absolute".parse::<PeakPolicy>().expect("policy"), PeakPolicy::Absolute);
    assert_eq!("max".parse::<PeakPolicy>().expect("policy"), PeakPolicy::Max);
    assert_eq!(PeakPolicy::from_code(2).expect("policy"), PeakPolicy::Min);
    let err = "largest".parse::<PeakPolicy>().unwrap_err();
    assert!(matches!(err, FnetError::Dispatch(_)));
    let err = PeakPolicy::from_code(3).unwrap_err();
    assert_eq!(err.info().code, "unknown_peak_policy");
}

#[test]
fn scalar_statistics_pass_through() {
    assert_eq!(
        peak_of(&Statistic::Scalar(15.0), PeakPolicy::Min).expect("peak"),
        Peak::Scalar(15.0)
    );
    let series = Statistic::Series(TimeSeries::new(vec![1.0, 2.0], vec![-1.0, 0.5]));
    assert_eq!(
        peak_of(&series, PeakPolicy::Absolute).expect("peak"),
        Peak::Timed { time: 1.0, value: -1.0 }
    );
}

#[test]
fn peaks_serialize_by_shape() {
    let timed = serde_json::to_value(Peak::Timed { time: 1.0, value: 2.0 }).expect("json");
    assert_eq!(timed, serde_json::json!({"time": 1.0, "value": 2.0}));
    let scalar = serde_json::to_value(Peak::Scalar(3.0)).expect("json");
    assert_eq!(scalar, serde_json::json!(3.0));
}
