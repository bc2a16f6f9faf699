//! Test fixtures for market record assembly
//!
//! Sheets are built as raw cell grids or serialized to CSV bytes with the
//! same column positions the real exports use.

use crate::app::models::{Cell, Row};
use crate::app::services::assembler::{IdGenerator, MarketRecordAssembler, SequentialIdGenerator};
use crate::config::Config;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};


pub const HOME_BRAND: &str = "Russ Lyon Sotheby's International Realty";

pub const LAYOUT_A_HEADER: [&str; 17] = [
    "Rank",
    "Brand",
    "Total ($)",
    "% Chg",
    "",
    "",
    "Market Share ($)",
    "",
    "Total (#)",
    "",
    "",
    "",
    "Market Share (#)",
    "Avg Price",
    "SP/LP",
    "DOM",
    "$/SqFt",
];

pub const LAYOUT_B_HEADER: [&str; 13] = [
    "#",
    "Brokerage",
    "Office",
    "Volume",
    "",
    "",
    "Units",
    "",
    "Mkt %",
    "DOM",
    "Avg Price",
    "$/SqFt",
    "SP/LP",
];

/// Assembler with deterministic `test-N` identifiers
pub fn assembler() -> MarketRecordAssembler {
    MarketRecordAssembler::new(&Config::default(), Arc::new(SequentialIdGenerator::new("test")))
        .unwrap()
}

pub fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Cell::from(*c)).collect()
}

/// LayoutA data row: brand, dollar volume, decimal dollar share, unit count, decimal unit share
pub fn layout_a_row(rank: f64, brand: &str, volume: f64, share_dollar: f64, units: f64, share_units: f64) -> Row {
    vec![
        Cell::Number(rank),
        Cell::from(brand),
        Cell::Number(volume),
        Cell::Number(0.0),
        Cell::Number(0.0),
        Cell::Number(0.0),
        Cell::Number(share_dollar),
        Cell::Number(0.0),
        Cell::Number(units),
        Cell::Number(0.0),
        Cell::Number(0.0),
        Cell::Number(0.0),
        Cell::Number(share_units),
        Cell::Number(500_000.0),
        Cell::Number(0.98),
        Cell::Number(45.0),
        Cell::Number(250.0),
    ]
}

/// The reference LayoutA sheet: header plus one home brand row
pub fn layout_a_scenario() -> Vec<Row> {
    vec![
        text_row(&LAYOUT_A_HEADER),
        layout_a_row(1.0, HOME_BRAND, 5_000_000.0, 0.25, 10.0, 0.30),
    ]
}

/// Serialize a grid of text cells to CSV bytes
pub fn csv_bytes(rows: &[Vec<String>]) -> Vec<u8> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.into_inner().unwrap()
}

/// LayoutB CSV with one row per (brand, volume, units, mkt %)
pub fn layout_b_csv(rows: &[(&str, f64, f64, f64)]) -> Vec<u8> {
    let mut grid = vec![LAYOUT_B_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    for (brand, volume, units, market_percent) in rows {
        grid.push(vec![
            String::new(),
            brand.to_string(),
            "Main Office".to_string(),
            format!("${}", volume),
            String::new(),
            String::new(),
            units.to_string(),
            String::new(),
            format!("{}%", market_percent),
            "41".to_string(),
            "$650,000".to_string(),
            "$380".to_string(),
            "96.4%".to_string(),
        ]);
    }
    csv_bytes(&grid)
}

/// Identifier source that panics on one chosen call
pub struct PanickingIdGenerator {
    panic_on: u64,
    counter: AtomicU64,
}

impl PanickingIdGenerator {
    pub fn new(panic_on: u64) -> Self {
        Self {
            panic_on,
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for PanickingIdGenerator {
    fn next_id(&self) -> String {
        let call = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.panic_on {
            panic!("id source exhausted on call {}", call);
        }
        format!("panicky-{}", call)
    }
}
