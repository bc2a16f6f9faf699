//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, input discovery and
//! progress bars used by more than one command.

use crate::app::services::sheet_reader::is_supported;
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins over `level` when set.
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("market_share_processor={}", level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    }

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> env -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    let config = apply_cli_overrides(Config::load(args.config_file.as_deref())?, args);
    config.validate()?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(mut config: Config, args: &ProcessArgs) -> Config {
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(level) = args.log_level_override() {
        config = config.with_log_level(level);
    }
    config
}

/// Expand files, directories and glob patterns into a list of input files
///
/// Explicit files are kept even with an unsupported extension so they show
/// up as error records. Directory and pattern matches are filtered to
/// supported spreadsheet types. Order follows the inputs, duplicates removed.
pub fn discover_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        let path = Path::new(input);
        let found = if path.is_dir() {
            discover_directory(path)
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            expand_pattern(input)?
        };

        if found.is_empty() {
            warn!("No supported files found for input '{}'", input);
        }
        for file in found {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        return Err(Error::configuration(format!(
            "No input files found in: {}",
            inputs.join(", ")
        )));
    }

    info!("Discovered {} input files", files.len());
    Ok(files)
}

/// Supported files under `dir`, sorted
fn discover_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path) && !is_lock_file(path))
        .collect();
    files.sort();

    debug!("Discovered {} files in {}", files.len(), dir.display());
    files
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern)
        .map_err(|e| Error::configuration(format!("Invalid input pattern '{}': {}", pattern, e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_supported(path) && !is_lock_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Office lock files (`~$Report.xlsx`) sit next to open workbooks
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("~$"))
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
