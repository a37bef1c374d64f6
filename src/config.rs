use crate::chart::{ChartStyle, MAX_PIXELS};
use crate::cleaning::DEFAULT_OUTLIER_THRESHOLD_MS;
use crate::error::ChartError;
use crate::frame::{Column, Windows};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "measurements-";

static ENDPOINT_COLUMNS: Lazy<Vec<Column>> = Lazy::new(|| {
    vec![
        Column::ErrorPctMovingAverage,
        Column::ResponseTime,
        Column::ResponseTimeMovingAverage,
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartJob {
    pub name: String,
    pub file: PathBuf,
    pub columns: Vec<Column>,
}

impl ChartJob {
    fn new(name: &str, file: &str, columns: Vec<Column>) -> Self {
        ChartJob {
            name: name.to_string(),
            file: PathBuf::from(file),
            columns,
        }
    }

    /// `measurements-data.json` becomes `data`.
    pub fn output_stem(&self) -> String {
        let stem = self
            .file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        match stem.strip_prefix(FILE_PREFIX) {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => stem,
        }
    }

    pub fn output_path(&self, dir: &Path, format: ImageFormat) -> PathBuf {
        dir.join(format!("{}.{}", self.output_stem(), format.extension()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub jobs: Vec<ChartJob>,
    pub outlier_threshold_ms: u64,
    pub windows: Windows,
    pub dpi: u32,
    pub format: ImageFormat,
    pub output_dir: PathBuf,
    pub font: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let mut data_columns = ENDPOINT_COLUMNS.clone();
        data_columns.push(Column::Measuretime);
        data_columns.push(Column::MeasuretimeMovingAverage);

        Self {
            jobs: vec![
                ChartJob::new(
                    "/data (3 parallel requests)",
                    "measurements-data.json",
                    data_columns,
                ),
                ChartJob::new(
                    "/log (3 parallel requests)",
                    "measurements-log.json",
                    ENDPOINT_COLUMNS.clone(),
                ),
                ChartJob::new(
                    "/fetch_recrypt (3 parallel requests)",
                    "measurements-fetch_recrypt.json",
                    ENDPOINT_COLUMNS.clone(),
                ),
            ],
            outlier_threshold_ms: DEFAULT_OUTLIER_THRESHOLD_MS,
            windows: Windows::default(),
            dpi: 250,
            format: ImageFormat::Png,
            output_dir: PathBuf::from("."),
            font: None,
        }
    }
}

impl RenderConfig {
    /// Reads a job file. Fields it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ChartError> {
        let bytes =
            std::fs::read(path).map_err(|error| ChartError::ReadFile(path.to_path_buf(), error))?;
        let config: RenderConfig = serde_json::from_slice(&bytes).map_err(|error| {
            ChartError::InvalidConfig(format!("{}: {}", path.display(), error))
        })?;
        Ok(config)
    }

    pub fn output_path(&self, job: &ChartJob) -> PathBuf {
        job.output_path(&self.output_dir, self.format)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        self.windows.validate()?;
        if self.dpi == 0 {
            return Err(ChartError::InvalidConfig("dpi must be at least 1".to_string()));
        }
        let style = ChartStyle {
            dpi: self.dpi,
            text: false,
        };
        match style.pixel_count() {
            Some(pixels) if pixels <= MAX_PIXELS => {}
            _ => {
                return Err(ChartError::InvalidConfig(format!(
                    "dpi {} gives a figure above {} pixels",
                    self.dpi, MAX_PIXELS
                )))
            }
        }
        if self.jobs.is_empty() {
            return Err(ChartError::InvalidConfig("no jobs configured".to_string()));
        }

        let mut outputs = HashSet::new();
        for job in &self.jobs {
            if job.columns.is_empty() {
                return Err(ChartError::InvalidConfig(format!(
                    "job {:?} selects no columns",
                    job.name
                )));
            }
            let output = self.output_path(job);
            if !outputs.insert(output.clone()) {
                return Err(ChartError::InvalidConfig(format!(
                    "more than one job writes {}",
                    output.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ChartJob, ImageFormat, RenderConfig};
    use crate::error::ChartError;
    use crate::frame::Column;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_default_jobs() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.jobs.len(), 3);
        assert_eq!(config.jobs[0].columns.len(), 5);
        assert_eq!(config.jobs[0].columns[0], Column::ErrorPctMovingAverage);
        assert_eq!(
            config.jobs[2].columns,
            vec![
                Column::ErrorPctMovingAverage,
                Column::ResponseTime,
                Column::ResponseTimeMovingAverage,
            ]
        );
        assert_eq!(
            config
                .jobs
                .iter()
                .map(|job| config.output_path(job))
                .collect::<Vec<_>>(),
            vec![
                PathBuf::from("./data.png"),
                PathBuf::from("./log.png"),
                PathBuf::from("./fetch_recrypt.png"),
            ]
        );
    }

    #[test]
    fn test_output_stem_without_prefix() {
        let job = ChartJob {
            name: "latency".to_string(),
            file: PathBuf::from("runs/latency.json"),
            columns: vec![Column::ResponseTime],
        };
        assert_eq!(job.output_stem(), "latency");
    }

    #[test]
    fn test_from_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "jobs": [{{"name": "/data", "file": "measurements-data.json", "columns": ["response_time"]}}],
                "windows": {{"error_pct": 50}},
                "format": "svg"
            }}"#
        )
        .unwrap();

        let config = RenderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.windows.error_pct, 50);
        assert_eq!(config.windows.response_time, 150);
        assert_eq!(config.format, ImageFormat::Svg);
        assert_eq!(config.dpi, 250);
        assert_eq!(config.outlier_threshold_ms, 50_000);
    }

    #[test]
    fn test_from_file_rejects_unknown_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"jobs": [{{"name": "x", "file": "x.json", "columns": ["errors"]}}]}}"#
        )
        .unwrap();

        match RenderConfig::from_file(file.path()) {
            Err(ChartError::InvalidConfig(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_outputs() {
        let mut config = RenderConfig::default();
        config.jobs[1].file = PathBuf::from("other/measurements-data.json");
        assert!(matches!(config.validate(), Err(ChartError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_empty_columns() {
        let mut config = RenderConfig::default();
        config.jobs[0].columns.clear();
        assert!(matches!(config.validate(), Err(ChartError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_huge_dpi() {
        let mut config = RenderConfig::default();
        config.dpi = 100_000;
        assert!(matches!(config.validate(), Err(ChartError::InvalidConfig(_))));

        config.dpi = u32::MAX;
        assert!(matches!(config.validate(), Err(ChartError::InvalidConfig(_))));

        config.dpi = 1800;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = RenderConfig::default();
        config.windows.measuretime = 0;
        assert!(matches!(config.validate(), Err(ChartError::ZeroWindow(_))));
    }
}
