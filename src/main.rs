use anyhow::Context;
use clap::Parser;
use market_share_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; never resolve
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result.context("Command failed")
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(market_share_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
                .context("Command aborted")
            }
        }
    })
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Market Share Processor - Brokerage Market Share Ingestion");
    println!("=========================================================");
    println!();
    println!("Reads brokerage market share exports (CSV or spreadsheet workbooks),");
    println!("ranks brokerages and reports where the home brand leads.");
    println!();
    println!("USAGE:");
    println!("    market-share <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process market share files into market records");
    println!("    detect      Show the derived market name and layout of one file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Process every export in a directory:");
    println!("    market-share process ./exports");
    println!();
    println!("    # Summaries by units sold, as JSON:");
    println!("    market-share process ./exports --summary --view units --output-format json");
    println!();
    println!("    # Check which layout a file uses:");
    println!("    market-share detect MarketshareSedona.xlsx");
    println!();
    println!("For detailed help on any command, use:");
    println!("    market-share <COMMAND> --help");
}
