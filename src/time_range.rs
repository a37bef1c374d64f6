use crate::cleaning::CleanMeasurement;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Span of a collector run as seen from its records.
#[derive(Debug, PartialEq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub duration: Duration,
}

impl TimeRange {
    /// `None` for an empty run.
    pub fn from_measurements(measurements: &[CleanMeasurement]) -> Option<Self> {
        let first = measurements.first()?;
        let last = measurements.last()?;

        let start = measurements
            .iter()
            .find(|m| m.timestamp != 0)
            .and_then(|m| Self::device_time(m.timestamp));
        let end = measurements
            .iter()
            .rev()
            .find(|m| m.timestamp != 0)
            .and_then(|m| Self::device_time(m.timestamp));

        Some(TimeRange {
            start,
            end,
            duration: Duration::milliseconds(last.elapsed.saturating_sub(first.elapsed) as i64),
        })
    }

    fn device_time(timestamp: u64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(timestamp as i64).single()
    }

    /// Requests per second over the run, `None` for runs shorter than 1 ms.
    pub fn throughput(&self, requests: usize) -> Option<f64> {
        let millis = self.duration.num_milliseconds();
        if millis <= 0 {
            return None;
        }
        Some(requests as f64 * 1000.0 / millis as f64)
    }

    pub fn describe(&self) -> String {
        let seconds = self.duration.num_seconds();
        let span = format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            seconds % 3600 / 60,
            seconds % 60
        );
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!(
                "{} from {} to {}",
                span,
                start.format("%Y-%m-%dT%H:%M:%SZ"),
                end.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            _ => span,
        }
    }
}
