//! Row accounting for the per-layout parsers

use super::RowDecision;
use crate::app::models::BrokerageRecord;
use serde::{Deserialize, Serialize};

/// Parsed records together with the row accounting
#[derive(Debug, Clone)]
pub struct RowParseOutcome {
    /// Records in parse order
    pub records: Vec<BrokerageRecord>,

    pub stats: RowParseStats,
}

/// Counts for every data row seen by a parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowParseStats {
    /// Data rows examined, header excluded
    pub total_rows: usize,

    /// Rows that produced a record
    pub kept: usize,

    /// Rows skipped because the brand cell was blank
    pub blank_brand: usize,

    /// Rows skipped because every share (and, for LayoutA, the volume) was zero
    pub placeholder: usize,
}

impl RowParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discarded(&self) -> usize {
        self.blank_brand + self.placeholder
    }

    /// Every examined row is either kept or discarded for a known reason
    pub fn is_balanced(&self) -> bool {
        self.kept + self.discarded() == self.total_rows
    }
}

impl RowParseOutcome {
    pub(crate) fn with_capacity(rows: usize) -> Self {
        Self {
            records: Vec::with_capacity(rows),
            stats: RowParseStats::new(),
        }
    }

    pub(crate) fn record(&mut self, decision: RowDecision) {
        self.stats.total_rows += 1;
        match decision {
            RowDecision::Kept(record) => {
                self.stats.kept += 1;
                self.records.push(record);
            }
            RowDecision::BlankBrand => self.stats.blank_brand += 1,
            RowDecision::Placeholder => self.stats.placeholder += 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
