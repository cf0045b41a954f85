use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tidings_common::TidingsError;
use tidings_common::observability::{LogFormat, init_logging};
use tidings_config::{TidingsConfig, TidingsConfigLoader};
use tidings_drivers::browser::TidingsDriver;
use tidings_http::HttpClient;
use tidings_web::{FileExportSink, HttpImageFetcher, JsonWorkItem, Pipeline, PipelineSettings};
use tracing::{info, warn};

/// Search a news feed and export the matching listings.
#[derive(Debug, Parser)]
#[command(name = "tidings", version)]
struct Cli {
    /// YAML configuration (site, selectors, output, logging).
    #[arg(long, env = "TIDINGS_CONFIG", default_value = "tidings.yaml")]
    config: PathBuf,

    /// JSON file with `search_phrase`, `news_categories` and `number_of_months`.
    #[arg(long, env = "TIDINGS_WORK_ITEM")]
    work_item: PathBuf,

    /// Where `{"valid_categories": [...]}` is written. Defaults to
    /// `<work-item>.output.json`.
    #[arg(long)]
    work_item_output: Option<PathBuf>,

    /// Override `webdriver.headless`.
    #[arg(long)]
    headless: Option<bool>,

    /// Override `logging.format` (`text` or `json`).
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over the file, flags win over both)
    let mut cfg: TidingsConfig = TidingsConfigLoader::new()
        .with_file(&cli.config)
        .load()
        .map_err(TidingsError::from)?;
    if let Some(headless) = cli.headless {
        cfg.webdriver.headless = headless;
    }
    if let Some(format) = cli.log_format {
        cfg.logging.format = format;
    }

    let log_path = init_logging(cfg.logging.to_log_config())?;
    info!(
        config = %cli.config.display(),
        log_file = %log_path.display(),
        version = cfg.version.as_deref().unwrap_or("-"),
        "tidings.starting"
    );

    let work_item = match cli.work_item_output {
        Some(output) => JsonWorkItem::new(cli.work_item, output),
        None => JsonWorkItem::beside(cli.work_item),
    };

    // 2) Browser session; closed whatever the run outcome
    let driver = TidingsDriver::new(&cfg.webdriver.url, cfg.webdriver.headless).await?;
    let mut pipeline = Pipeline::new(
        driver.page(),
        HttpImageFetcher::new(HttpClient::new()?),
        work_item,
        FileExportSink,
        PipelineSettings::from(&cfg),
    );
    let outcome = pipeline.run().await;

    if let Err(err) = driver.close().await {
        warn!(error = %err, "webdriver.close_failed");
    }

    let summary = outcome?;
    info!(
        scanned = summary.scanned,
        exported = summary.exported,
        valid_categories = ?summary.valid_categories,
        export = %summary.export_path.display(),
        "tidings.finished"
    );
    Ok(())
}
