//! Per-layout row parsers for brokerage market share exports
//!
//! Both layouts end in the same [`BrokerageRecord`] shape with shares on a
//! 0-100 scale, but they get there differently:
//!
//! - [`layout_a`] - row-by-row; shares are stored as 0-1 decimals
//! - [`layout_b`] - whole collection at once; dollar share is derived from
//!   each row's volume over the file's total volume
//! - [`stats`] - accounting of kept and discarded data rows
//!
//! ## Usage
//!
//! ```rust
//! use market_share_processor::app::models::{Cell, FileFormat};
//! use market_share_processor::app::services::entity::HomeBrandMatcher;
//! use market_share_processor::app::services::row_parsers::{parse_rows, ParseContext};
//!
//! # fn example(data_rows: Vec<Vec<Cell>>) -> market_share_processor::Result<()> {
//! let matcher = HomeBrandMatcher::with_defaults()?;
//! let ctx = ParseContext::new(&matcher);
//! let outcome = parse_rows(FileFormat::LayoutB, &data_rows, &ctx)?;
//!
//! println!("Kept {} of {} rows", outcome.stats.kept, outcome.stats.total_rows);
//! # Ok(())
//! # }
//! ```

pub mod layout_a;
pub mod layout_b;
pub mod stats;

#[cfg(test)]
pub mod tests;

use crate::app::models::{BrokerageRecord, FileFormat, Row};
use crate::app::services::entity::HomeBrandMatcher;
use crate::app::services::format_detector::{LayoutAColumns, LayoutBColumns};
use crate::{Error, Result};
use tracing::debug;

pub use layout_a::parse_layout_a_row;
pub use layout_b::parse_layout_b_rows;
pub use stats::{RowParseOutcome, RowParseStats};

/// Shared, read-only inputs for every row parser
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub matcher: &'a HomeBrandMatcher,
    pub layout_a: LayoutAColumns,
    pub layout_b: LayoutBColumns,
}

impl<'a> ParseContext<'a> {
    /// Context with the standard column maps
    pub fn new(matcher: &'a HomeBrandMatcher) -> Self {
        Self {
            matcher,
            layout_a: LayoutAColumns::default(),
            layout_b: LayoutBColumns::default(),
        }
    }

    /// Replace both column maps
    pub fn with_columns(mut self, layout_a: LayoutAColumns, layout_b: LayoutBColumns) -> Self {
        self.layout_a = layout_a;
        self.layout_b = layout_b;
        self
    }
}

/// Why a data row did not produce a record
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowDecision {
    Kept(BrokerageRecord),
    BlankBrand,
    Placeholder,
}

/// Run the parser for `format` over the data rows (header excluded)
pub fn parse_rows(format: FileFormat, rows: &[Row], ctx: &ParseContext<'_>) -> Result<RowParseOutcome> {
    let outcome = match format {
        FileFormat::LayoutA => {
            let mut outcome = RowParseOutcome::with_capacity(rows.len());
            for row in rows {
                outcome.record(layout_a::classify_row(row, ctx));
            }
            outcome
        }
        FileFormat::LayoutB => layout_b::parse_outcome(rows, ctx),
        FileFormat::Unknown => return Err(Error::UnrecognizedFormat),
    };

    debug!(
        "{} rows parsed: {} kept, {} blank brand, {} placeholder",
        format,
        outcome.stats.kept,
        outcome.stats.blank_brand,
        outcome.stats.placeholder
    );

    Ok(outcome)
}
