//! Export planning and the packager contract

use super::render::RenderedImage;
use crate::app::models::MarketRecord;
use crate::config::ReportConfig;
use crate::constants::{ARCHIVE_NAME_PREFIX, MAX_BROKERAGES_EXPORT};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which files are produced per market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    ImageOnly,
    DocumentOnly,
    Both,
}

impl ExportFormat {
    pub fn includes_image(&self) -> bool {
        matches!(self, ExportFormat::ImageOnly | ExportFormat::Both)
    }

    pub fn includes_document(&self) -> bool {
        matches!(self, ExportFormat::DocumentOnly | ExportFormat::Both)
    }

    /// Artifacts written per market
    pub fn artifacts_per_market(&self) -> usize {
        match self {
            ExportFormat::Both => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::ImageOnly => "image",
            ExportFormat::DocumentOnly => "document",
            ExportFormat::Both => "both",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExportFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "image" | "png" => Ok(ExportFormat::ImageOnly),
            "document" | "pdf" => Ok(ExportFormat::DocumentOnly),
            "both" => Ok(ExportFormat::Both),
            other => Err(crate::Error::configuration(format!(
                "unknown export format '{}', expected image, document or both",
                other
            ))),
        }
    }
}

/// A rendered market handed to the packager
#[derive(Debug, Clone)]
pub struct ExportItem {
    pub file_stem: String,
    pub image: RenderedImage,
}

/// One packaged file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Builds image and document files, and the archive around them
pub trait ExportPackager: Send + Sync {
    fn package(&self, items: &[ExportItem], format: ExportFormat) -> Result<Vec<ExportArtifact>>;
}

/// Planned artifact names for one reportable market
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMarket {
    pub record_id: String,
    pub market: String,
    pub file_stem: String,
    pub artifacts: Vec<String>,
}

/// What a batch export will write, computed before any rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub format: ExportFormat,
    pub archive_name: String,
    /// Brokerages drawn per exported chart
    pub chart_limit: usize,
    pub markets: Vec<PlannedMarket>,
}

impl ExportPlan {
    /// Plan with the default archive prefix
    pub fn for_records(records: &[MarketRecord], format: ExportFormat, date: NaiveDate) -> Self {
        Self::with_archive_prefix(records, format, date, ARCHIVE_NAME_PREFIX)
    }

    /// Plan using the configured archive prefix and export chart limit
    pub fn from_config(
        records: &[MarketRecord],
        format: ExportFormat,
        date: NaiveDate,
        report: &ReportConfig,
    ) -> Self {
        Self::with_archive_prefix(records, format, date, &report.archive_prefix)
            .with_chart_limit(report.export_chart_limit)
    }

    /// Plan for the reportable records, in input order
    ///
    /// Repeated file stems get a numeric suffix so no artifact overwrites
    /// another inside the archive.
    pub fn with_archive_prefix(
        records: &[MarketRecord],
        format: ExportFormat,
        date: NaiveDate,
        archive_prefix: &str,
    ) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();

        let markets = ready_markets(records)
            .into_iter()
            .map(|record| {
                let base = safe_file_stem(record.display_title());
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let file_stem = if *count == 1 {
                    base
                } else {
                    format!("{}-{}", base, count)
                };

                let mut artifacts = Vec::with_capacity(format.artifacts_per_market());
                if format.includes_image() {
                    artifacts.push(format!("{}.png", file_stem));
                }
                if format.includes_document() {
                    artifacts.push(format!("{}.pdf", file_stem));
                }

                PlannedMarket {
                    record_id: record.id().to_string(),
                    market: record.display_title().to_string(),
                    file_stem,
                    artifacts,
                }
            })
            .collect();

        Self {
            format,
            archive_name: format!("{}-{}.zip", archive_prefix, date.format("%Y-%m-%d")),
            chart_limit: MAX_BROKERAGES_EXPORT,
            markets,
        }
    }

    pub fn with_chart_limit(mut self, chart_limit: usize) -> Self {
        self.chart_limit = chart_limit;
        self
    }

    /// Progress steps: one per artifact
    pub fn total_steps(&self) -> usize {
        self.markets.len() * self.format.artifacts_per_market()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Every artifact name, in packaging order
    pub fn artifact_names(&self) -> impl Iterator<Item = &str> {
        self.markets
            .iter()
            .flat_map(|m| m.artifacts.iter().map(String::as_str))
    }
}

/// Keep ASCII letters, digits and spaces, then join words with `-`
pub fn safe_file_stem(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let stem = kept.split_whitespace().collect::<Vec<_>>().join("-");
    if stem.is_empty() {
        "market".to_string()
    } else {
        stem
    }
}

/// Records that can produce at least one report, in input order
pub fn ready_markets(records: &[MarketRecord]) -> Vec<&MarketRecord> {
    records.iter().filter(|r| r.is_reportable()).collect()
}
