//! Command-line argument definitions for the market share processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::ShareType;
use crate::app::services::report::ExportFormat;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the market share processor
///
/// Reads brokerage market share exports (CSV or spreadsheet workbooks),
/// detects their layout, ranks brokerages and reports where the home brand
/// leads.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "market-share",
    version,
    about = "Ingest brokerage market share spreadsheets and rank the home brand",
    long_about = "Processes brokerage market share exports in either supported column layout. \
                  Every file becomes a market record with ranked brokerages, home brand \
                  identification, available report views and data-quality warnings. A bad file \
                  never stops the rest of the batch."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process market share files into market records
    Process(ProcessArgs),
    /// Show the derived market name and detected layout of one file
    Detect(DetectArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Files, directories or glob patterns to process
    ///
    /// Directories are walked recursively for .csv, .xlsx, .xlsm, .xlsb, .xls
    /// and .ods files. Patterns such as 'exports/Marketshare*.xlsx' are
    /// expanded when the shell has not already done so.
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/market-share/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of files parsed concurrently
    ///
    /// Defaults to the configured worker count, which defaults to the number
    /// of CPU cores.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files parsed concurrently"
    )]
    pub workers: Option<usize>,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Share metric used for summaries
    #[arg(
        long = "view",
        value_name = "VIEW",
        default_value = "dollar",
        help = "Share metric for summaries: dollar or units"
    )]
    pub view: ShareType,

    /// Print home brand KPIs and the executive summary for each reportable market
    #[arg(long = "summary")]
    pub summary: bool,

    /// Print the artifacts a batch export would produce
    #[arg(
        long = "export-plan",
        value_name = "FORMAT",
        help = "Print planned export artifacts: image, document or both"
    )]
    pub export_plan: Option<ExportFormat>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Hide the progress bar
    #[arg(long = "no-progress", help = "Disable the progress bar")]
    pub no_progress: bool,
}

/// Arguments for the detect command
#[derive(Debug, Clone, Parser)]
pub struct DetectArgs {
    /// File to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format, one line per market record
    Csv,
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.inputs.iter().all(|input| input.trim().is_empty()) {
            return Err(Error::configuration("No input files given"));
        }

        Ok(())
    }

    /// Log level implied by -v/-q, or `None` to keep the configured level
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.quiet {
            Some("error")
        } else {
            match self.verbose {
                0 => None,
                1 => Some("info"),
                2 => Some("debug"),
                _ => Some("trace"),
            }
        }
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

impl DetectArgs {
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
