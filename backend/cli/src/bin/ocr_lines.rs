use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cloudsight_cli::{ocr, Settings};
use cloudsight_config::{config_dir, config_file_path, load_and_prepare};
use cloudsight_core::CacheMode;
use cloudsight_logging::init_logger;

#[derive(Parser)]
#[command(name = "ocr-lines")]
#[command(about = "Print the text lines detected in a document image")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.cloudsight/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document image to read when the cache is cold
    #[arg(long)]
    document: Option<PathBuf>,

    /// Response cache file
    #[arg(long)]
    cache: Option<PathBuf>,

    /// warm-only | return-fetched
    #[arg(long)]
    cache_mode: Option<CacheMode>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let prepared = load_and_prepare(&config_path).await?;

    let mut settings = Settings::from_config(&prepared.config);
    if let Some(document) = cli.document {
        settings.document = document;
    }
    if let Some(cache) = cli.cache {
        settings.cache_path = cache;
    }
    if let Some(mode) = cli.cache_mode {
        settings.cache_mode = mode;
    }

    init_logger(settings.log_dir.as_deref(), &settings.log_level)?;
    prepared.log_warnings();
    info!(config = %config_path.display(), "Starting OCR run");

    let client = settings.build_client();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ocr::run(&settings, &client, &mut out).await?;
    out.flush()?;

    Ok(())
}
