use crate::chart::{render_to_file, ChartStyle, Plot};
use crate::cleaning::{clean, CleaningReport};
use crate::config::{ChartJob, ImageFormat, RenderConfig};
use crate::error::ChartError;
use crate::frame::{MeasurementFrame, Windows};
use crate::measurement::load_measurements;
use crate::metric::SeriesSummary;
use crate::time_range::TimeRange;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug)]
pub struct RenderReport {
    pub name: String,
    pub output: PathBuf,
    pub cleaning: CleaningReport,
    pub summary: SeriesSummary,
    pub time_range: Option<TimeRange>,
}

impl RenderReport {
    pub fn log(&self) {
        log::info!(
            "{}: {} requests, {} errors, {} measuretime gaps filled, {} response outliers replaced",
            self.name,
            self.summary.requests,
            self.cleaning.errors,
            self.cleaning.filled_measuretimes,
            self.cleaning.replaced_outliers
        );
        log::info!(
            "{}: response time avg {:.1} ms (min {}, max {}), measuretime avg {:.1} ms, error rate {:.2}%",
            self.name,
            self.summary.response_time.average,
            self.summary.response_time.minimum,
            self.summary.response_time.maximum,
            self.summary.measuretime.average,
            self.summary.error_pct
        );
        if let Some(time_range) = &self.time_range {
            match time_range.throughput(self.summary.requests) {
                Some(throughput) => log::info!(
                    "{}: run {} at {:.2} requests/s",
                    self.name,
                    time_range.describe(),
                    throughput
                ),
                None => log::info!("{}: run {}", self.name, time_range.describe()),
            }
        }
        log::info!("{}: wrote {}", self.name, self.output.display());
    }
}

#[async_trait]
pub trait Render {
    async fn render(&self, job: &ChartJob) -> Result<RenderReport, ChartError>;
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    outlier_threshold: u64,
    windows: Windows,
    format: ImageFormat,
    output_dir: PathBuf,
    style: ChartStyle,
}

#[async_trait]
impl Render for ChartRenderer {
    async fn render(&self, job: &ChartJob) -> Result<RenderReport, ChartError> {
        log::info!("{}: reading {}", job.name, job.file.display());
        let bytes = tokio::fs::read(&job.file)
            .await
            .map_err(|error| ChartError::ReadFile(job.file.clone(), error))?;

        let renderer = self.clone();
        let job = job.clone();
        tokio::task::spawn_blocking(move || renderer.render_bytes(&job, &bytes)).await?
    }
}

impl ChartRenderer {
    pub fn new(config: &RenderConfig, text: bool) -> Self {
        ChartRenderer {
            outlier_threshold: config.outlier_threshold_ms,
            windows: config.windows,
            format: config.format,
            output_dir: config.output_dir.clone(),
            style: ChartStyle {
                dpi: config.dpi,
                text,
            },
        }
    }

    fn render_bytes(&self, job: &ChartJob, bytes: &[u8]) -> Result<RenderReport, ChartError> {
        let measurements = load_measurements(&job.file, bytes)?;
        if measurements.is_empty() {
            return Err(ChartError::NoMeasurements(job.file.clone()));
        }

        let (cleaned, cleaning) = clean(&measurements, self.outlier_threshold);
        log::debug!("{}: {:?}", job.name, cleaning);
        let frame = MeasurementFrame::build(&cleaned, &self.windows)?;

        let output = job.output_path(&self.output_dir, self.format);
        render_to_file(
            &output,
            self.format,
            &Plot {
                name: &job.name,
                frame: &frame,
                columns: &job.columns,
                style: self.style,
            },
        )?;

        Ok(RenderReport {
            name: job.name.clone(),
            output,
            cleaning,
            summary: SeriesSummary::from_cleaned(&cleaned),
            time_range: TimeRange::from_measurements(&cleaned),
        })
    }
}
