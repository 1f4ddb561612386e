use fnet_core::{ErrorInfo, FnetError, ReportCommand};
use fnet_report::{TimeSeriesTable, TimeSlice};

use crate::series::TimeSeries;

fn statistic_error(code: &str, message: impl Into<String>) -> FnetError {
    FnetError::Statistic(ErrorInfo::new(code, message))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population spread of `(x, y)` about the centroid.
///
/// Equal to `sqrt(mean(x² + y²) - mean(x)² - mean(y)²)`; evaluated as the mean
/// squared deviation from the centroid so that it cannot go negative.
pub fn radius_of_gyration(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let (cx, cy) = (mean(x), mean(y));
    let spread = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - cx).powi(2) + (yi - cy).powi(2))
        .sum::<f64>()
        / n as f64;
    spread.max(0.0).sqrt()
}

/// Mean of the per-point force magnitudes `sqrt(fx² + fy²)`.
pub fn mean_force_magnitude(fx: &[f64], fy: &[f64]) -> f64 {
    let magnitudes: Vec<f64> = fx.iter().zip(fy).map(|(a, b)| a.hypot(*b)).collect();
    if magnitudes.is_empty() {
        return 0.0;
    }
    mean(&magnitudes)
}

/// Magnitude of the summed force vector `sqrt((Σfx)² + (Σfy)²)`.
pub fn total_force_magnitude(fx: &[f64], fy: &[f64]) -> f64 {
    fx.iter().sum::<f64>().hypot(fy.iter().sum::<f64>())
}

/// Sum over fiber sections of each section's summed force magnitude.
pub fn fiber_force_magnitude(slice: &TimeSlice, fx: &[f64], fy: &[f64]) -> f64 {
    slice
        .fiber_ranges()
        .into_iter()
        .map(|range| total_force_magnitude(&fx[range.clone()], &fy[range]))
        .sum()
}

fn require_rows(slice: &TimeSlice, table: &TimeSeriesTable) -> Result<(), FnetError> {
    if slice.is_empty() {
        return Err(statistic_error(
            "empty_slice",
            format!("no rows reported at time {}", slice.time),
        )
        .with_context("source", table.source())
        .with_context("time", slice.time.to_string()));
    }
    Ok(())
}

fn column<'t>(
    slice: &'t TimeSlice,
    table: &TimeSeriesTable,
    index: usize,
) -> Result<&'t [f64], FnetError> {
    slice.column(index).ok_or_else(|| {
        statistic_error(
            "missing_column",
            format!("column {index} is absent from a {}-column table", slice.width()),
        )
        .with_context("source", table.source())
        .with_context("time", slice.time.to_string())
    })
}

fn per_slice<F>(table: &TimeSeriesTable, mut eval: F) -> Result<TimeSeries, FnetError>
where
    F: FnMut(&TimeSlice) -> Result<f64, FnetError>,
{
    let mut values = Vec::with_capacity(table.len());
    for slice in table.slices() {
        require_rows(slice, table)?;
        values.push(eval(slice)?);
    }
    Ok(TimeSeries::new(table.times(), values))
}

/// Radius of gyration at every time of a `fiber:force` table.
pub fn radius(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        let x = column(slice, table, ReportCommand::X)?;
        let y = column(slice, table, ReportCommand::Y)?;
        Ok(radius_of_gyration(x, y))
    })
}

/// Mean per-point force magnitude at every time of a `fiber:force` table.
pub fn force(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        let fx = column(slice, table, ReportCommand::FX)?;
        let fy = column(slice, table, ReportCommand::FY)?;
        Ok(mean_force_magnitude(fx, fy))
    })
}

/// Magnitude of the network's summed force vector at every time.
pub fn total_force(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        let fx = column(slice, table, ReportCommand::FX)?;
        let fy = column(slice, table, ReportCommand::FY)?;
        Ok(total_force_magnitude(fx, fy))
    })
}

/// Per-fiber summed force magnitudes, added over fibers, at every time.
pub fn fiber_force(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        let fx = column(slice, table, ReportCommand::FX)?;
        let fy = column(slice, table, ReportCommand::FY)?;
        Ok(fiber_force_magnitude(slice, fx, fy))
    })
}

/// Mean tension over model points at every time.
pub fn tension(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        Ok(mean(column(slice, table, ReportCommand::TENSION)?))
    })
}

/// Mean ratio of end-to-end distance to contour length over fibers, from a `fiber` table.
pub fn effective_length(table: &TimeSeriesTable) -> Result<TimeSeries, FnetError> {
    per_slice(table, |slice| {
        let contour = column(slice, table, ReportCommand::CONTOUR_LENGTH)?;
        let end_to_end = column(slice, table, ReportCommand::END_TO_END)?;
        let mut ratios = Vec::with_capacity(contour.len());
        for (length, ee) in contour.iter().zip(end_to_end) {
            if *length == 0.0 {
                return Err(statistic_error(
                    "zero_contour_length",
                    format!("fiber with zero contour length at time {}", slice.time),
                )
                .with_context("source", table.source())
                .with_context("time", slice.time.to_string()));
            }
            ratios.push(ee / length);
        }
        Ok(mean(&ratios))
    })
}

fn require_samples(series: &TimeSeries, wanted: &str) -> Result<(), FnetError> {
    if series.len() < 2 {
        return Err(statistic_error(
            "too_few_samples",
            format!("{wanted} needs at least two samples, found {}", series.len()),
        ));
    }
    Ok(())
}

/// Forward difference of the radius series, aligned to `times[1..]`.
pub fn contraction_rate(radius: &TimeSeries) -> Result<TimeSeries, FnetError> {
    require_samples(radius, "contraction rate")?;
    let times = &radius.times;
    let values = &radius.values;
    let rates = (1..values.len())
        .map(|i| (values[i] - values[i - 1]) / (times[i] - times[i - 1]))
        .collect();
    Ok(TimeSeries::new(times.iter().skip(1).copied().collect(), rates))
}

/// Rectangle-rule integral of the tension series.
///
/// Uses the first sample spacing as a constant step for all samples but the
/// last, so the result is only exact for uniformly sampled reports.
pub fn tension_integral(tension: &TimeSeries) -> Result<f64, FnetError> {
    require_samples(tension, "tension integral")?;
    let step = tension.times[1] - tension.times[0];
    Ok(tension.values[..tension.len() - 1].iter().sum::<f64>() * step)
}
