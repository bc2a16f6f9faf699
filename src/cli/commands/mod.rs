//! Command implementations for the market share CLI
//!
//! Each command lives in its own module:
//! - `process`: batch ingestion with human, JSON or CSV output
//! - `detect`: layout detection for a single file

pub mod detect;
pub mod process;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args, cancel).await.map(|_| ())
        }
        Some(Commands::Detect(detect_args)) => detect::run_detect(detect_args).await,
        None => Err(crate::Error::configuration("No command given")),
    }
}
