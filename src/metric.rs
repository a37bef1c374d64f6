use crate::cleaning::CleanMeasurement;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use std::ops::{Add, Div};

#[derive(Debug, PartialEq)]
pub struct AggregatedMetrics {
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

impl Default for AggregatedMetrics {
    fn default() -> Self {
        Self {
            average: 0.0,
            maximum: 0.0,
            minimum: 0.0,
        }
    }
}

impl AggregatedMetrics {
    pub fn aggregate(values: &[u64]) -> Self {
        if values.is_empty() {
            return AggregatedMetrics::default();
        }
        let mut total = BigDecimal::from(0);
        let mut minimum = u64::MAX;
        let mut maximum = 0u64;
        for value in values {
            total = total.add(BigDecimal::from(*value));
            minimum = minimum.min(*value);
            maximum = maximum.max(*value);
        }

        let count = BigDecimal::from_usize(values.len()).unwrap_or_else(|| BigDecimal::from(1));
        let average = total.div(count).to_f64().unwrap_or_default();
        AggregatedMetrics {
            average,
            maximum: maximum as f64,
            minimum: minimum as f64,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct SeriesSummary {
    pub requests: usize,
    pub response_time: AggregatedMetrics,
    pub measuretime: AggregatedMetrics,
    pub error_pct: f64,
}

impl SeriesSummary {
    pub fn from_cleaned(cleaned: &[CleanMeasurement]) -> Self {
        let response_times: Vec<u64> = cleaned.iter().map(|m| m.response_time).collect();
        let measuretimes: Vec<u64> = cleaned.iter().map(|m| m.measuretime).collect();
        let errors = cleaned.iter().filter(|m| m.had_error).count();
        let error_pct = if cleaned.is_empty() {
            0.0
        } else {
            errors as f64 * 100.0 / cleaned.len() as f64
        };

        SeriesSummary {
            requests: cleaned.len(),
            response_time: AggregatedMetrics::aggregate(&response_times),
            measuretime: AggregatedMetrics::aggregate(&measuretimes),
            error_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cleaning::{clean, DEFAULT_OUTLIER_THRESHOLD_MS};
    use crate::measurement::load_measurements;
    use crate::metric::{AggregatedMetrics, SeriesSummary};
    use std::path::Path;

    #[test]
    fn test_aggregate() {
        let result = AggregatedMetrics::aggregate(&[55, 28, 40, 51]);
        assert!((result.average - 43.5).abs() < 1e-9);
        assert_eq!(result.maximum, 55.0);
        assert_eq!(result.minimum, 28.0);
    }

    #[test]
    fn test_aggregate_when_zero_value() {
        assert_eq!(AggregatedMetrics::aggregate(&[]), AggregatedMetrics::default());
    }

    #[test]
    fn test_summary_from_fixture() {
        let path = Path::new("test_resources/valid/measurements-data.json");
        let measurements = load_measurements(path, &std::fs::read(path).unwrap()).unwrap();
        let (cleaned, _) = clean(&measurements, DEFAULT_OUTLIER_THRESHOLD_MS);
        let summary = SeriesSummary::from_cleaned(&cleaned);

        assert_eq!(summary.requests, 6);
        assert!((summary.response_time.average - 51040.0 / 6.0).abs() < 1e-6);
        assert_eq!(summary.response_time.maximum, 50000.0);
        assert_eq!(summary.response_time.minimum, 180.0);
        assert_eq!(summary.measuretime.minimum, 398.0);
        assert_eq!(summary.measuretime.maximum, 420.0);
        assert!((summary.error_pct - 100.0 / 3.0).abs() < 1e-9);
    }
}
