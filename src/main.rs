mod chart;
mod cleaning;
mod config;
mod error;
mod font;
mod frame;
mod measurement;
mod metric;
mod renderer;
mod rolling;
mod time_range;

use anyhow::Context;
use clap::Parser;
use config::{ImageFormat, RenderConfig};
use renderer::{ChartRenderer, Render};
use std::path::PathBuf;
use std::sync::Arc;

/// Cleans endpoint measurement files and renders their latency and error
/// rate charts.
#[derive(Debug, Parser)]
#[command(name = "measurement-charts")]
struct Cli {
    /// JSON job file. Without it the three endpoint charts are rendered.
    #[arg(long, value_name = "FILE")]
    jobs: Option<PathBuf>,

    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<ImageFormat>,

    #[arg(long)]
    dpi: Option<u32>,

    /// TrueType font for chart text.
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<RenderConfig> {
        let config = match &self.jobs {
            Some(path) => RenderConfig::from_file(path)
                .with_context(|| format!("loading jobs from {}", path.display()))?,
            None => RenderConfig::default(),
        };
        let config = self.override_config(config);
        config.validate()?;
        Ok(config)
    }

    /// Flags given on the command line win over the job file.
    fn override_config(self, mut config: RenderConfig) -> RenderConfig {
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(font) = self.font {
            config.font = Some(font);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let config = cli.into_config()?;
    let text = font::prepare(config.font.as_deref()).is_some();
    let renderer = Arc::new(ChartRenderer::new(&config, text));

    let mut handles = Vec::new();
    for job in config.jobs {
        let renderer = Arc::clone(&renderer);
        handles.push(tokio::spawn(async move {
            let result = renderer.render(&job).await;
            (job, result)
        }));
    }

    let mut failed = 0;
    for handle in handles {
        let (job, result) = handle.await?;
        match result {
            Ok(report) => report.log(),
            Err(error) => {
                log::error!("{}: {}", job.name, error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of the charts could not be rendered", failed);
    }
    Ok(())
}
