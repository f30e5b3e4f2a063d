mod cli;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pollgate_core::config::{load_dotenv, Config};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = Config::from_env();
    if let Some(max_size) = args.max_size {
        config.queue.max_size = max_size;
    }
    if let Some(batch_size) = args.batch_size {
        config.queue.batch_size = batch_size;
    }
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let (records, skipped) = replay::load_log(&args.input).await?;
    info!(
        path = %args.input.display(),
        records = records.len(),
        skipped,
        "Loaded poll log"
    );

    let summary = replay::replay(records, skipped, &config).await?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("failed to serialize summary")?;
    println!("{out}");

    Ok(())
}
