use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cloudsight_cli::{celebrities, parse_threshold, Settings};
use cloudsight_config::{config_dir, config_file_path, load_and_prepare};
use cloudsight_logging::init_logger;

#[derive(Parser)]
#[command(name = "celebrity-boxes")]
#[command(about = "Recognize celebrities and save annotated copies of each photo")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.cloudsight/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Confidence a face must exceed to be drawn (0-100)
    #[arg(long, value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// Photos to process; replaces the configured list
    photos: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let prepared = load_and_prepare(&config_path).await?;

    let mut settings = Settings::from_config(&prepared.config);
    if !cli.photos.is_empty() {
        settings.photos = cli.photos;
    }
    if let Some(threshold) = cli.threshold {
        settings.confidence_threshold = threshold;
    }

    init_logger(settings.log_dir.as_deref(), &settings.log_level)?;
    prepared.log_warnings();
    info!(
        config = %config_path.display(),
        photos = settings.photos.len(),
        "Starting celebrity run"
    );

    let client = settings.build_client();
    let annotator = settings.build_annotator();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    celebrities::run(&settings, &client, &annotator, &mut out).await?;
    out.flush()?;

    Ok(())
}
