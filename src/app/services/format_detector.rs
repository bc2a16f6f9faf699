//! Spreadsheet layout detection and per-layout column maps
//!
//! Detection only looks at the header row. The "Mkt %" check at a fixed
//! column runs first and short-circuits; the "Market Share ($)/(#)" scan over
//! every header runs only when that check fails.

use crate::app::models::{Cell, FileFormat};
use crate::app::services::normalizer::strip_bom;
use crate::constants::{
    MARKET_PERCENT_HEADER_INDEX, MARKET_PERCENT_HEADER_PATTERN, MARKET_SHARE_HEADER_PATTERNS,
    layout_a, layout_b,
};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static MARKET_PERCENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MARKET_PERCENT_HEADER_PATTERN).expect("market percent header pattern is valid")
});

static MARKET_SHARE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    MARKET_SHARE_HEADER_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("market share header patterns are valid"))
        .collect()
});

/// Classify a header row into a known layout
pub fn detect_format(headers: &[String]) -> FileFormat {
    let format = if headers
        .get(MARKET_PERCENT_HEADER_INDEX)
        .is_some_and(|h| MARKET_PERCENT_PATTERN.is_match(strip_bom(h)))
    {
        FileFormat::LayoutB
    } else if headers.iter().any(|h| {
        let h = strip_bom(h);
        MARKET_SHARE_PATTERNS.iter().any(|p| p.is_match(h))
    }) {
        FileFormat::LayoutA
    } else {
        FileFormat::Unknown
    };

    debug!(
        "Detected {} layout from {} header cells",
        format,
        headers.len()
    );
    format
}

/// Header row as trimmed strings with any byte-order mark removed
pub fn clean_headers(header_row: &[Cell]) -> Vec<String> {
    header_row
        .iter()
        .map(|cell| strip_bom(&cell.as_text()).trim().to_string())
        .collect()
}

// =============================================================================
// Column Maps
// =============================================================================

/// Column indices for LayoutA exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutAColumns {
    pub rank: usize,
    pub brand: usize,
    pub dollar_volume: usize,
    pub percent_change: usize,
    pub market_share_dollar: usize,
    pub total_sales: usize,
    pub market_share_units: usize,
    pub avg_price: usize,
    pub sale_to_list_ratio: usize,
    pub days_on_market: usize,
    pub price_per_sq_ft: usize,
}

impl Default for LayoutAColumns {
    fn default() -> Self {
        Self {
            rank: layout_a::RANK,
            brand: layout_a::BRAND,
            dollar_volume: layout_a::DOLLAR_VOLUME,
            percent_change: layout_a::PERCENT_CHANGE,
            market_share_dollar: layout_a::MARKET_SHARE_DOLLAR,
            total_sales: layout_a::TOTAL_SALES,
            market_share_units: layout_a::MARKET_SHARE_UNITS,
            avg_price: layout_a::AVG_PRICE,
            sale_to_list_ratio: layout_a::SALE_TO_LIST_RATIO,
            days_on_market: layout_a::DAYS_ON_MARKET,
            price_per_sq_ft: layout_a::PRICE_PER_SQ_FT,
        }
    }
}

impl LayoutAColumns {
    fn fields(&self) -> [(&'static str, usize); 11] {
        [
            ("rank", self.rank),
            ("brand", self.brand),
            ("dollar_volume", self.dollar_volume),
            ("percent_change", self.percent_change),
            ("market_share_dollar", self.market_share_dollar),
            ("total_sales", self.total_sales),
            ("market_share_units", self.market_share_units),
            ("avg_price", self.avg_price),
            ("sale_to_list_ratio", self.sale_to_list_ratio),
            ("days_on_market", self.days_on_market),
            ("price_per_sq_ft", self.price_per_sq_ft),
        ]
    }

    /// Reject maps that read two fields from one column
    pub fn validate(&self) -> Result<()> {
        ensure_distinct(FileFormat::LayoutA, &self.fields())
    }
}

/// Column indices for LayoutB exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutBColumns {
    pub brand: usize,
    pub dollar_volume: usize,
    pub total_sales: usize,
    /// Unit share column, also the detection marker
    pub market_percent: usize,
    pub days_on_market: usize,
    pub avg_price: usize,
    pub price_per_sq_ft: usize,
    pub sale_to_list_ratio: usize,
}

impl Default for LayoutBColumns {
    fn default() -> Self {
        Self {
            brand: layout_b::BRAND,
            dollar_volume: layout_b::DOLLAR_VOLUME,
            total_sales: layout_b::TOTAL_SALES,
            market_percent: layout_b::MARKET_PERCENT,
            days_on_market: layout_b::DAYS_ON_MARKET,
            avg_price: layout_b::AVG_PRICE,
            price_per_sq_ft: layout_b::PRICE_PER_SQ_FT,
            sale_to_list_ratio: layout_b::SALE_TO_LIST_RATIO,
        }
    }
}

impl LayoutBColumns {
    fn fields(&self) -> [(&'static str, usize); 8] {
        [
            ("brand", self.brand),
            ("dollar_volume", self.dollar_volume),
            ("total_sales", self.total_sales),
            ("market_percent", self.market_percent),
            ("days_on_market", self.days_on_market),
            ("avg_price", self.avg_price),
            ("price_per_sq_ft", self.price_per_sq_ft),
            ("sale_to_list_ratio", self.sale_to_list_ratio),
        ]
    }

    /// Reject duplicate columns and a market percent column the detector
    /// would never check
    pub fn validate(&self) -> Result<()> {
        if self.market_percent != MARKET_PERCENT_HEADER_INDEX {
            return Err(Error::invalid_column_map(
                FileFormat::LayoutB.to_string(),
                format!(
                    "market_percent must be column {} to match format detection, got {}",
                    MARKET_PERCENT_HEADER_INDEX, self.market_percent
                ),
            ));
        }
        ensure_distinct(FileFormat::LayoutB, &self.fields())
    }
}

fn ensure_distinct(layout: FileFormat, fields: &[(&'static str, usize)]) -> Result<()> {
    let mut seen: HashMap<usize, &'static str> = HashMap::with_capacity(fields.len());
    for (name, index) in fields {
        if let Some(previous) = seen.insert(*index, name) {
            return Err(Error::invalid_column_map(
                layout.to_string(),
                format!(
                    "fields '{}' and '{}' both read column {}",
                    previous, name, index
                ),
            ));
        }
    }
    Ok(())
}
