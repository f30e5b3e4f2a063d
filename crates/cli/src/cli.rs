use std::path::PathBuf;

use clap::Parser;

/// Replay a recorded poll log through the ingestion queue and the
/// per-source failure tracker, then print a JSON summary.
#[derive(Parser, Debug)]
#[command(name = "pollgate", version, about)]
pub struct CliArgs {
    /// JSON-lines poll log: one `{"source", "outcome", "payload"}` object per line.
    #[arg(long, env = "POLLGATE_INPUT")]
    pub input: PathBuf,

    /// Queue capacity override (default from QUEUE_MAX_SIZE).
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Drain batch size override (default from QUEUE_BATCH_SIZE).
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pretty-print the summary.
    #[arg(long)]
    pub pretty: bool,
}
