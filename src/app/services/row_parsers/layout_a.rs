//! LayoutA row parsing
//!
//! LayoutA exports carry both share columns as 0-1 decimals and a source rank
//! column. Each row is independent of the others.

use super::{ParseContext, RowDecision};
use crate::app::models::{BrokerageRecord, Cell};
use crate::app::services::normalizer::{
    PercentEncoding, normalize_percentage_scale, parse_numeric, parse_text,
};

/// Parse one LayoutA data row
///
/// Returns `None` for rows with a blank brand and for placeholder rows where
/// dollar share, unit share and dollar volume are all exactly zero.
pub fn parse_layout_a_row(row: &[Cell], ctx: &ParseContext<'_>) -> Option<BrokerageRecord> {
    match classify_row(row, ctx) {
        RowDecision::Kept(record) => Some(record),
        RowDecision::BlankBrand | RowDecision::Placeholder => None,
    }
}

pub(crate) fn classify_row(row: &[Cell], ctx: &ParseContext<'_>) -> RowDecision {
    let cols = &ctx.layout_a;

    let brand = parse_text(row.get(cols.brand));
    if brand.is_empty() {
        return RowDecision::BlankBrand;
    }

    let dollar_volume = parse_numeric(row.get(cols.dollar_volume));
    let market_share_dollar = normalize_percentage_scale(
        parse_numeric(row.get(cols.market_share_dollar)),
        PercentEncoding::Decimal,
    );
    let market_share_units = normalize_percentage_scale(
        parse_numeric(row.get(cols.market_share_units)),
        PercentEncoding::Decimal,
    );

    if market_share_dollar == 0.0 && market_share_units == 0.0 && dollar_volume == 0.0 {
        return RowDecision::Placeholder;
    }

    let sale_to_list_ratio = normalize_percentage_scale(
        parse_numeric(row.get(cols.sale_to_list_ratio)),
        PercentEncoding::Decimal,
    ) / 100.0;

    RowDecision::Kept(BrokerageRecord {
        rank: source_rank(parse_numeric(row.get(cols.rank))),
        name: ctx.matcher.canonicalize(&brand),
        is_home_brand: ctx.matcher.is_home_brand(&brand),
        original_name: brand,
        dollar_volume,
        market_share_dollar,
        market_share_units,
        total_sales: parse_numeric(row.get(cols.total_sales)),
        avg_price: parse_numeric(row.get(cols.avg_price)),
        days_on_market: parse_numeric(row.get(cols.days_on_market)),
        price_per_sq_ft: parse_numeric(row.get(cols.price_per_sq_ft)),
        sale_to_list_ratio,
        percent_change: parse_numeric(row.get(cols.percent_change)),
    })
}

/// Rank as printed in the source; replaced once the ranking pass runs
fn source_rank(value: f64) -> u32 {
    if value >= 1.0 { value as u32 } else { 0 }
}
