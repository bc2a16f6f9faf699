//! Data models for market share processing
//!
//! This module contains the raw cell grid read from spreadsheets, the per-row
//! brokerage record, and the assembled market record handed to report
//! renderers and exporters.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Raw Sheet Cells
// =============================================================================

/// One raw spreadsheet cell as read from CSV text or a workbook
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One raw spreadsheet row
pub type Row = Vec<Cell>;

impl Cell {
    /// Render the cell as a spreadsheet export would print it
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string().to_uppercase(),
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

// =============================================================================
// Classification Enums
// =============================================================================

/// Known spreadsheet column layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Explicit "Market Share ($)" and "Market Share (#)" columns, decimal-encoded
    LayoutA,
    /// "Mkt %" unit share at a fixed column; dollar share derived from volume
    LayoutB,
    /// No recognizable layout markers
    Unknown,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::LayoutA => "LayoutA",
            FileFormat::LayoutB => "LayoutB",
            FileFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Market share metric a report can be built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    Dollar,
    Units,
}

impl ShareType {
    /// Both metric views in canonical order
    pub const ALL: [ShareType; 2] = [ShareType::Dollar, ShareType::Units];

    /// Human-readable label used in narratives
    pub fn label(&self) -> &'static str {
        match self {
            ShareType::Dollar => "dollar volume",
            ShareType::Units => "units sold",
        }
    }
}

impl fmt::Display for ShareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareType::Dollar => f.write_str("dollar"),
            ShareType::Units => f.write_str("units"),
        }
    }
}

impl FromStr for ShareType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dollar" | "dollars" | "$" => Ok(ShareType::Dollar),
            "units" | "unit" | "#" => Ok(ShareType::Units),
            other => Err(Error::configuration(format!(
                "Unknown share type '{}': expected 'dollar' or 'units'",
                other
            ))),
        }
    }
}

/// Lifecycle status of a market record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Parsing,
    Validating,
    Ready,
    Warning,
    Error,
}

impl FileStatus {
    /// Ready, warning and error are terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Ready | FileStatus::Warning | FileStatus::Error)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStatus::Parsing => "parsing",
            FileStatus::Validating => "validating",
            FileStatus::Ready => "ready",
            FileStatus::Warning => "warning",
            FileStatus::Error => "error",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Brokerage Record
// =============================================================================

/// One brokerage's performance within a single market file
///
/// Shares are always on a 0-100 scale; the sale-to-list ratio is on a 0-1
/// scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageRecord {
    /// 1-based position, reassigned after sorting
    pub rank: u32,

    /// Canonical display name
    pub name: String,

    /// Name exactly as found in the source file
    pub original_name: String,

    pub is_home_brand: bool,
    pub dollar_volume: f64,
    pub market_share_dollar: f64,
    pub market_share_units: f64,
    pub total_sales: f64,
    pub avg_price: f64,
    pub days_on_market: f64,
    pub price_per_sq_ft: f64,
    pub sale_to_list_ratio: f64,

    /// Signed change; 0 when the layout carries no such column
    pub percent_change: f64,
}

impl BrokerageRecord {
    /// Share for the given metric
    pub fn share(&self, share_type: ShareType) -> f64 {
        match share_type {
            ShareType::Dollar => self.market_share_dollar,
            ShareType::Units => self.market_share_units,
        }
    }

    /// Copy of this record carrying a new rank
    pub fn with_rank(&self, rank: u32) -> Self {
        Self {
            rank,
            ..self.clone()
        }
    }
}

// =============================================================================
// Validation Warnings
// =============================================================================

/// Non-terminal data-quality advisory attached to a market record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// No row matched the home brand patterns
    HomeBrandMissing { brand: String },

    /// The home brand is not #1 by any metric
    NoReportableView { brand: String },

    /// A share above 100%; flagged, never clamped
    ShareAboveHundred {
        brokerage: String,
        share_type: ShareType,
        value: f64,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::HomeBrandMissing { brand } => {
                write!(f, "{} not found in this dataset", brand)
            }
            ValidationWarning::NoReportableView { brand } => write!(
                f,
                "{} is not #1 in any market share view; no report can be generated",
                brand
            ),
            ValidationWarning::ShareAboveHundred {
                brokerage,
                share_type,
                value,
            } => {
                let label = match share_type {
                    ShareType::Dollar => "dollar share",
                    ShareType::Units => "unit share",
                };
                write!(f, "{}: {} {:.1}% exceeds 100%", brokerage, label, value)
            }
        }
    }
}

// =============================================================================
// Market Record
// =============================================================================

/// Fully parsed, ranked and validated representation of one uploaded file
///
/// Fields are readable through accessors only. The display title override is
/// the single field callers may change after assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub(crate) id: String,
    pub(crate) source_file_name: String,
    pub(crate) derived_market_name: String,
    pub(crate) display_title_override: Option<String>,
    pub(crate) detected_format: FileFormat,
    pub(crate) brokerages: Vec<BrokerageRecord>,
    pub(crate) home_brand_index: Option<usize>,
    pub(crate) is_home_brand_first_by_dollar: bool,
    pub(crate) is_home_brand_first_by_units: bool,
    pub(crate) available_metric_views: Vec<ShareType>,
    pub(crate) total_market_dollar: f64,
    pub(crate) total_market_units: f64,
    pub(crate) status: FileStatus,
    pub(crate) warnings: Vec<ValidationWarning>,
    pub(crate) errors: Vec<String>,
    pub(crate) processed_at: DateTime<Utc>,
}

impl MarketRecord {
    /// Build an unusable record carrying a single error message
    pub(crate) fn failed(
        id: String,
        source_file_name: impl Into<String>,
        derived_market_name: impl Into<String>,
        detected_format: FileFormat,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source_file_name: source_file_name.into(),
            derived_market_name: derived_market_name.into(),
            display_title_override: None,
            detected_format,
            brokerages: Vec::new(),
            home_brand_index: None,
            is_home_brand_first_by_dollar: false,
            is_home_brand_first_by_units: false,
            available_metric_views: Vec::new(),
            total_market_dollar: 0.0,
            total_market_units: 0.0,
            status: FileStatus::Error,
            warnings: Vec::new(),
            errors: vec![message.into()],
            processed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    pub fn derived_market_name(&self) -> &str {
        &self.derived_market_name
    }

    pub fn display_title_override(&self) -> Option<&str> {
        self.display_title_override.as_deref()
    }

    /// Title shown on reports: the override when set, else the derived name
    pub fn display_title(&self) -> &str {
        self.display_title_override
            .as_deref()
            .unwrap_or(&self.derived_market_name)
    }

    /// Set or clear the display title; blank titles clear the override
    pub fn set_display_title_override(&mut self, title: impl Into<String>) {
        let title = title.into();
        let trimmed = title.trim();
        self.display_title_override = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn detected_format(&self) -> FileFormat {
        self.detected_format
    }

    /// Brokerages sorted by dollar share descending, ranked 1..N
    pub fn brokerages(&self) -> &[BrokerageRecord] {
        &self.brokerages
    }

    pub fn home_brand_record(&self) -> Option<&BrokerageRecord> {
        self.home_brand_index.and_then(|i| self.brokerages.get(i))
    }

    pub fn is_home_brand_first_by_dollar(&self) -> bool {
        self.is_home_brand_first_by_dollar
    }

    pub fn is_home_brand_first_by_units(&self) -> bool {
        self.is_home_brand_first_by_units
    }

    pub fn available_metric_views(&self) -> &[ShareType] {
        &self.available_metric_views
    }

    pub fn supports_view(&self, share_type: ShareType) -> bool {
        self.available_metric_views.contains(&share_type)
    }

    /// `requested` when this market supports it, else its first available view
    pub fn effective_view(&self, requested: ShareType) -> Option<ShareType> {
        if self.supports_view(requested) {
            Some(requested)
        } else {
            self.available_metric_views.first().copied()
        }
    }

    pub fn total_market_dollar(&self) -> f64 {
        self.total_market_dollar
    }

    pub fn total_market_units(&self) -> f64 {
        self.total_market_units
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Warnings rendered as display strings
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    /// Whether any report can be produced from this record
    pub fn is_reportable(&self) -> bool {
        self.status != FileStatus::Error && !self.available_metric_views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_brokerage(name: &str, dollar: f64, units: f64) -> BrokerageRecord {
        BrokerageRecord {
            rank: 1,
            name: name.to_string(),
            original_name: name.to_string(),
            is_home_brand: false,
            dollar_volume: 1000.0,
            market_share_dollar: dollar,
            market_share_units: units,
            total_sales: 3.0,
            avg_price: 333.0,
            days_on_market: 20.0,
            price_per_sq_ft: 250.0,
            sale_to_list_ratio: 0.97,
            percent_change: 0.0,
        }
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::Empty.as_text(), "");
        assert_eq!(Cell::Number(5_000_000.0).as_text(), "5000000");
        assert_eq!(Cell::Number(0.25).as_text(), "0.25");
        assert_eq!(Cell::Text(" Brand ".into()).as_text(), " Brand ");
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_share_type_parsing() {
        assert_eq!("dollar".parse::<ShareType>().unwrap(), ShareType::Dollar);
        assert_eq!("Units".parse::<ShareType>().unwrap(), ShareType::Units);
        assert!("volume".parse::<ShareType>().is_err());
        assert_eq!(ShareType::Units.to_string(), "units");
    }

    #[test]
    fn test_status_terminality() {
        assert!(!FileStatus::Parsing.is_terminal());
        assert!(!FileStatus::Validating.is_terminal());
        assert!(FileStatus::Ready.is_terminal());
        assert!(FileStatus::Warning.is_terminal());
        assert!(FileStatus::Error.is_terminal());
    }

    #[test]
    fn test_brokerage_with_rank_leaves_original_untouched() {
        let original = sample_brokerage("Alpha Realty", 40.0, 35.0);
        let reranked = original.with_rank(4);
        assert_eq!(original.rank, 1);
        assert_eq!(reranked.rank, 4);
        assert_eq!(reranked.share(ShareType::Units), 35.0);
    }

    #[test]
    fn test_warning_messages_are_distinguishable() {
        let missing = ValidationWarning::HomeBrandMissing {
            brand: "Home".into(),
        };
        let no_view = ValidationWarning::NoReportableView {
            brand: "Home".into(),
        };
        let above = ValidationWarning::ShareAboveHundred {
            brokerage: "Alpha Realty".into(),
            share_type: ShareType::Dollar,
            value: 142.0,
        };
        assert_eq!(missing.to_string(), "Home not found in this dataset");
        assert!(no_view.to_string().contains("no report can be generated"));
        assert_eq!(
            above.to_string(),
            "Alpha Realty: dollar share 142.0% exceeds 100%"
        );
    }

    #[test]
    fn test_failed_record_invariants() {
        let record = MarketRecord::failed(
            "market-1".into(),
            "broken.xlsx",
            "Broken",
            FileFormat::Unknown,
            "Unrecognized file format. Expected LayoutA or LayoutB headers.",
        );
        assert_eq!(record.status(), FileStatus::Error);
        assert!(record.brokerages().is_empty());
        assert!(record.available_metric_views().is_empty());
        assert_eq!(record.errors().len(), 1);
        assert!(record.home_brand_record().is_none());
        assert!(!record.is_reportable());
    }

    #[test]
    fn test_title_override_is_the_only_mutation() {
        let mut record = MarketRecord::failed(
            "market-2".into(),
            "MarketshareSedona.xlsx",
            "Sedona",
            FileFormat::Unknown,
            "boom",
        );
        assert_eq!(record.display_title(), "Sedona");

        record.set_display_title_override("  Sedona Luxury Q3 ");
        assert_eq!(record.display_title(), "Sedona Luxury Q3");
        assert_eq!(record.derived_market_name(), "Sedona");

        record.set_display_title_override("   ");
        assert_eq!(record.display_title_override(), None);
        assert_eq!(record.display_title(), "Sedona");
    }

    #[test]
    fn test_effective_view_falls_back_to_first_available() {
        let mut record = MarketRecord::failed(
            "market-3".into(),
            "MarketshareScottsdale.xlsx",
            "Scottsdale",
            FileFormat::Unknown,
            "boom",
        );
        assert_eq!(record.effective_view(ShareType::Dollar), None);

        record.available_metric_views = vec![ShareType::Dollar];
        assert_eq!(record.effective_view(ShareType::Units), Some(ShareType::Dollar));
        assert_eq!(record.effective_view(ShareType::Dollar), Some(ShareType::Dollar));

        record.available_metric_views = vec![ShareType::Dollar, ShareType::Units];
        assert_eq!(record.effective_view(ShareType::Units), Some(ShareType::Units));
    }
}
