//! Test fixtures for report gating and export planning

use crate::app::models::MarketRecord;
use crate::app::services::assembler::tests::{
    HOME_BRAND, LAYOUT_A_HEADER, assembler, layout_a_row, layout_a_scenario, text_row,
};
use crate::app::services::report::{ChartSeries, RenderedImage, ReportRenderer, ReportRequest};
use crate::constants::PNG_SIGNATURE;
use crate::error::Result;
use std::sync::Mutex;


/// Home brand alone, #1 in both views
pub fn sole_leader(file_name: &str) -> MarketRecord {
    assembler().assemble_rows(file_name, &layout_a_scenario())
}

/// Home brand leads dollar share but trails in units
pub fn dollar_leader() -> MarketRecord {
    let rows = vec![
        text_row(&LAYOUT_A_HEADER),
        layout_a_row(1.0, HOME_BRAND, 2_500_000_000.0, 0.40, 1234.0, 0.22),
        layout_a_row(2.0, "Keller Williams", 900_000_000.0, 0.15, 2000.0, 0.35),
        layout_a_row(3.0, "Realty ONE", 700_000_000.0, 0.12, 1500.0, 0.30),
    ];
    assembler().assemble_rows("MarketshareScottsdale.xlsx", &rows)
}

pub fn unrecognized() -> MarketRecord {
    let rows = vec![text_row(&["Agent", "Office"]), text_row(&["Pat", "Main"])];
    assembler().assemble_rows("agents.csv", &rows)
}

/// PNG-signed bytes padded to `len`
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.resize(len.max(PNG_SIGNATURE.len()), 0);
    bytes
}

/// Renderer returning fixed-size images and recording every request
pub struct FakeRenderer {
    image_len: usize,
    panic_on_market: Option<String>,
    pub requests: Mutex<Vec<ReportRequest>>,
    pub series: Mutex<Vec<ChartSeries>>,
}

impl FakeRenderer {
    pub fn new(image_len: usize) -> Self {
        Self {
            image_len,
            panic_on_market: None,
            requests: Mutex::new(Vec::new()),
            series: Mutex::new(Vec::new()),
        }
    }

    pub fn panicking_on(mut self, market: &str) -> Self {
        self.panic_on_market = Some(market.to_string());
        self
    }
}

impl ReportRenderer for FakeRenderer {
    fn render(&self, request: &ReportRequest, series: &ChartSeries) -> Result<RenderedImage> {
        self.requests.lock().unwrap().push(request.clone());
        self.series.lock().unwrap().push(series.clone());
        if self.panic_on_market.as_deref() == Some(request.market()) {
            panic!("canvas lost for {}", series.title);
        }
        Ok(RenderedImage::new(request, png_bytes(self.image_len)))
    }
}
