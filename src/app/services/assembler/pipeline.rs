//! Single-file market record assembly
//!
//! Runs read → detect → parse → rank & validate → totals for one file. Every
//! failure along the way, including a panic inside a reader, becomes an
//! error-status record; no `Err` ever reaches the caller.

use super::id_generator::IdGenerator;
use crate::app::models::{FileFormat, FileStatus, MarketRecord, Row};
use crate::app::services::entity::HomeBrandMatcher;
use crate::app::services::format_detector::{
    LayoutAColumns, LayoutBColumns, clean_headers, detect_format,
};
use crate::app::services::market_name::derive_market_name;
use crate::app::services::ranking::{RankedMarket, aggregate_totals, rank_and_validate};
use crate::app::services::row_parsers::{ParseContext, parse_rows};
use crate::app::services::sheet_reader;
use crate::config::Config;
use crate::constants::{MIN_SHEET_ROWS, NO_DATA_ROWS_MESSAGE, NO_VALID_ROWS_MESSAGE};
use crate::{Error, Result};
use chrono::Utc;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds one [`MarketRecord`] per uploaded file
pub struct MarketRecordAssembler {
    matcher: HomeBrandMatcher,
    layout_a: LayoutAColumns,
    layout_b: LayoutBColumns,
    id_generator: Arc<dyn IdGenerator>,
}

/// Output of a successful pipeline run, before identity is attached
struct Assembled {
    format: FileFormat,
    ranked: RankedMarket,
    totals: (f64, f64),
}

impl MarketRecordAssembler {
    /// Validate the column maps and compile the home brand matcher
    pub fn new(config: &Config, id_generator: Arc<dyn IdGenerator>) -> Result<Self> {
        config.processing.layout_a.validate()?;
        config.processing.layout_b.validate()?;
        let matcher = HomeBrandMatcher::new(&config.home_brand)?;

        debug!(
            "Assembler ready: home brand '{}' with {} alias patterns",
            matcher.display_name(),
            matcher.pattern_count()
        );

        Ok(Self {
            matcher,
            layout_a: config.processing.layout_a,
            layout_b: config.processing.layout_b,
            id_generator,
        })
    }

    pub fn matcher(&self) -> &HomeBrandMatcher {
        &self.matcher
    }

    /// Assemble a record from an already-read cell grid
    pub fn assemble_rows(&self, file_name: &str, rows: &[Row]) -> MarketRecord {
        let id = self.id_generator.next_id();
        let market_name = derive_market_name(file_name);
        self.guarded(id, file_name, market_name, |id, market_name| {
            self.finish(id, file_name, market_name, self.build(rows))
        })
    }

    /// Assemble a record from file contents held in memory
    pub fn assemble_bytes(&self, file_name: &str, bytes: &[u8]) -> MarketRecord {
        let id = self.id_generator.next_id();
        let market_name = derive_market_name(file_name);
        self.guarded(id, file_name, market_name, |id, market_name| {
            let outcome =
                sheet_reader::read_bytes(file_name, bytes).and_then(|rows| self.build(&rows));
            self.finish(id, file_name, market_name, outcome)
        })
    }

    /// Assemble a record from a file on disk
    pub fn assemble_path(&self, path: &Path) -> MarketRecord {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let id = self.id_generator.next_id();
        let market_name = derive_market_name(&file_name);
        self.guarded(id, &file_name, market_name, |id, market_name| {
            let outcome = sheet_reader::read_path(path).and_then(|rows| self.build(&rows));
            self.finish(id, &file_name, market_name, outcome)
        })
    }

    /// Error record for a file that never reached the pipeline
    pub fn failed_record(&self, file_name: &str, message: impl Into<String>) -> MarketRecord {
        let message = message.into();
        warn!("{}: {}", file_name, message);
        MarketRecord::failed(
            self.id_generator.next_id(),
            file_name,
            derive_market_name(file_name),
            FileFormat::Unknown,
            message,
        )
    }

    /// Run `assemble`, turning a panic into an error record
    fn guarded<F>(&self, id: String, file_name: &str, market_name: String, assemble: F) -> MarketRecord
    where
        F: FnOnce(String, String) -> MarketRecord,
    {
        let fallback_id = id.clone();
        let fallback_name = market_name.clone();

        match panic::catch_unwind(AssertUnwindSafe(|| assemble(id, market_name))) {
            Ok(record) => record,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("{}: reader panicked: {}", file_name, message);
                MarketRecord::failed(
                    fallback_id,
                    file_name,
                    fallback_name,
                    FileFormat::Unknown,
                    message,
                )
            }
        }
    }

    /// Detect, parse, rank and validate a cell grid
    fn build(&self, rows: &[Row]) -> Result<Assembled> {
        debug!("Status {}: {} raw rows", FileStatus::Parsing, rows.len());

        if rows.len() < MIN_SHEET_ROWS {
            return Err(Error::empty_data(NO_DATA_ROWS_MESSAGE));
        }

        let headers = clean_headers(&rows[0]);
        let format = detect_format(&headers);
        if format == FileFormat::Unknown {
            return Err(Error::UnrecognizedFormat);
        }

        let ctx = ParseContext::new(&self.matcher).with_columns(self.layout_a, self.layout_b);
        let outcome = parse_rows(format, &rows[1..], &ctx)?;
        if outcome.is_empty() {
            debug!("{} layout detected but no row survived filtering", format);
            return Err(Error::empty_data(NO_VALID_ROWS_MESSAGE));
        }

        debug!(
            "Status {}: {} brokerages from {} data rows",
            FileStatus::Validating,
            outcome.stats.kept,
            outcome.stats.total_rows
        );

        let ranked = rank_and_validate(outcome.records, self.matcher.display_name());
        let totals = aggregate_totals(&ranked.brokerages);

        Ok(Assembled {
            format,
            ranked,
            totals,
        })
    }

    /// Stamp identity onto a built record, or convert a failure into one
    fn finish(
        &self,
        id: String,
        file_name: &str,
        market_name: String,
        outcome: Result<Assembled>,
    ) -> MarketRecord {
        match outcome {
            Ok(Assembled {
                format,
                ranked,
                totals: (total_market_dollar, total_market_units),
            }) => {
                let record = MarketRecord {
                    id,
                    source_file_name: file_name.to_string(),
                    derived_market_name: market_name,
                    display_title_override: None,
                    detected_format: format,
                    status: ranked.status(),
                    brokerages: ranked.brokerages,
                    home_brand_index: ranked.home_brand_index,
                    is_home_brand_first_by_dollar: ranked.is_home_brand_first_by_dollar,
                    is_home_brand_first_by_units: ranked.is_home_brand_first_by_units,
                    available_metric_views: ranked.available_metric_views,
                    total_market_dollar,
                    total_market_units,
                    warnings: ranked.warnings,
                    errors: Vec::new(),
                    processed_at: Utc::now(),
                };
                info!(
                    "Processed {} ({}): {} brokerages, status {}",
                    file_name,
                    record.detected_format,
                    record.brokerages.len(),
                    record.status
                );
                record
            }
            // Failed records never claim a layout
            Err(error) => {
                warn!("{}: {}", file_name, error);
                MarketRecord::failed(
                    id,
                    file_name,
                    market_name,
                    FileFormat::Unknown,
                    error.to_string(),
                )
            }
        }
    }
}

/// Text carried by a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error processing file".to_string()
    }
}
