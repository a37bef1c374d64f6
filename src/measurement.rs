use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One request as recorded by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub num: u64,
    pub measuretime: u64,
    pub timestamp: u64,
    pub elapsed: u64,
    pub response_time: u64,
    pub errors: u64,
}

/// Parses the JSON array stored in `path`. Record order is kept.
pub fn load_measurements(path: &Path, bytes: &[u8]) -> Result<Vec<Measurement>, ChartError> {
    serde_json::from_slice(bytes)
        .map_err(|error| ChartError::ParseMeasurements(path.to_path_buf(), error))
}

#[cfg(test)]
mod tests {
    use crate::error::ChartError;
    use crate::measurement::{load_measurements, Measurement};
    use std::path::Path;

    #[test]
    fn test_load_measurements() {
        let path = Path::new("test_resources/valid/measurements-data.json");
        let bytes = std::fs::read(path).unwrap();
        let measurements = load_measurements(path, &bytes).unwrap();

        assert_eq!(measurements.len(), 6);
        assert_eq!(
            measurements[0],
            Measurement {
                num: 1,
                measuretime: 412,
                timestamp: 1623093314000,
                elapsed: 180,
                response_time: 180,
                errors: 0,
            }
        );
    }

    #[test]
    fn test_load_ignores_unknown_fields() {
        let json = br#"[{"num":1,"measuretime":0,"timestamp":0,"elapsed":5,"response_time":5,"errors":0,"host":"air-q"}]"#;
        let measurements = load_measurements(Path::new("inline.json"), json).unwrap();
        assert_eq!(measurements[0].elapsed, 5);
    }

    #[test]
    fn test_load_missing_field() {
        let path = Path::new("test_resources/error/measurements-missing_field.json");
        let bytes = std::fs::read(path).unwrap();
        let result = load_measurements(path, &bytes);

        match result {
            Err(ChartError::ParseMeasurements(file, _)) => assert_eq!(file, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
