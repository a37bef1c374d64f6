use crate::measurement::Measurement;

pub const DEFAULT_OUTLIER_THRESHOLD_MS: u64 = 50_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanMeasurement {
    pub num: u64,
    pub timestamp: u64,
    pub elapsed: u64,
    pub errors: u64,
    pub measuretime: u64,
    pub response_time: u64,
    pub had_error: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct CleaningReport {
    pub errors: usize,
    pub filled_measuretimes: usize,
    pub replaced_outliers: usize,
}

/// Removes the collector's known artifacts, carrying the previous good value
/// forward wherever a reading is unusable.
///
/// * `had_error` marks records whose cumulative `errors` counter moved.
/// * A `measuretime` of 0 (reported on failed requests) takes the last
///   non-zero value.
/// * A `response_time` above `outlier_threshold` takes the last accepted one.
///
/// All carried values start at 0.
pub fn clean(
    measurements: &[Measurement],
    outlier_threshold: u64,
) -> (Vec<CleanMeasurement>, CleaningReport) {
    let mut report = CleaningReport::default();
    let mut errors = 0;
    let mut measuretime = 0;
    let mut response_time = 0;

    let cleaned = measurements
        .iter()
        .map(|measurement| {
            let had_error = measurement.errors != errors;
            if had_error {
                errors = measurement.errors;
                report.errors += 1;
            }

            if measurement.measuretime == 0 {
                report.filled_measuretimes += 1;
            } else {
                measuretime = measurement.measuretime;
            }

            if measurement.response_time > outlier_threshold {
                report.replaced_outliers += 1;
            } else {
                response_time = measurement.response_time;
            }

            CleanMeasurement {
                num: measurement.num,
                timestamp: measurement.timestamp,
                elapsed: measurement.elapsed,
                errors: measurement.errors,
                measuretime,
                response_time,
                had_error,
            }
        })
        .collect();

    (cleaned, report)
}
