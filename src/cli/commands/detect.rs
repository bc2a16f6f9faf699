//! Detect command: identify a file's layout without parsing its rows

use super::shared::setup_logging;
use crate::app::models::FileFormat;
use crate::app::services::format_detector::{clean_headers, detect_format};
use crate::app::services::market_name::derive_market_name;
use crate::app::services::sheet_reader::read_path;
use crate::cli::args::DetectArgs;
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::path::Path;
use tokio::task;

/// What the detector sees in one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub file_name: String,
    pub market_name: String,
    pub format: FileFormat,
    pub headers: Vec<String>,
    pub data_rows: usize,
}

/// Read only as far as the header row and classify it
pub fn detect_file(path: &Path) -> Result<Detection> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let rows = read_path(path)?;
    let headers = rows.first().map(|row| clean_headers(row)).unwrap_or_default();

    Ok(Detection {
        market_name: derive_market_name(&file_name),
        format: detect_format(&headers),
        data_rows: rows.len().saturating_sub(1),
        file_name,
        headers,
    })
}

/// Detect command runner
pub async fn run_detect(args: DetectArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    let path = args.file.clone();
    let detection = task::spawn_blocking(move || detect_file(&path))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Detection task failed: {}", e)))??;

    let format = match detection.format {
        FileFormat::Unknown => detection.format.to_string().bright_red(),
        _ => detection.format.to_string().bright_green(),
    };

    println!("{} {}", "File:".bold(), detection.file_name);
    println!("{} {}", "Market:".bold(), detection.market_name.bright_cyan());
    println!("{} {}", "Format:".bold(), format);
    println!("{} {}", "Data rows:".bold(), detection.data_rows);
    println!("{}", "Headers:".bold());
    for (index, header) in detection.headers.iter().enumerate() {
        if !header.is_empty() {
            println!("   {:>2}  {}", index, header);
        }
    }

    Ok(())
}
