//! Test fixtures for the row parsers
//!
//! Rows are built cell by cell at the column positions real exports use.

use crate::app::models::{Cell, Row};
use crate::app::services::entity::HomeBrandMatcher;


pub const HOME_BRAND: &str = "Russ Lyon Sotheby's International Realty";

pub fn matcher() -> HomeBrandMatcher {
    HomeBrandMatcher::with_defaults().unwrap()
}

/// Row of `width` empty cells with the given cells filled in
pub fn sparse_row(width: usize, cells: &[(usize, Cell)]) -> Row {
    let mut row = vec![Cell::Empty; width];
    for (index, cell) in cells {
        row[*index] = cell.clone();
    }
    row
}

/// LayoutA data row
#[allow(clippy::too_many_arguments)]
pub fn layout_a_row(
    rank: f64,
    brand: &str,
    dollar_volume: f64,
    share_dollar: f64,
    total_sales: f64,
    share_units: f64,
    avg_price: f64,
    sale_to_list: f64,
) -> Row {
    sparse_row(
        17,
        &[
            (0, Cell::Number(rank)),
            (1, Cell::from(brand)),
            (2, Cell::Number(dollar_volume)),
            (3, Cell::Number(-2.5)),
            (6, Cell::Number(share_dollar)),
            (8, Cell::Number(total_sales)),
            (12, Cell::Number(share_units)),
            (13, Cell::Number(avg_price)),
            (14, Cell::Number(sale_to_list)),
            (15, Cell::Number(45.0)),
            (16, Cell::Number(250.0)),
        ],
    )
}

/// LayoutB data row with volume, unit count and "Mkt %"
pub fn layout_b_row(brand: &str, dollar_volume: f64, total_sales: f64, market_percent: f64) -> Row {
    sparse_row(
        13,
        &[
            (1, Cell::from(brand)),
            (3, Cell::Number(dollar_volume)),
            (6, Cell::Number(total_sales)),
            (8, Cell::Number(market_percent)),
            (9, Cell::Number(38.0)),
            (10, Cell::Number(812_000.0)),
            (11, Cell::Number(415.0)),
            (12, Cell::Number(97.5)),
        ],
    )
}
