//! LayoutB collection parsing
//!
//! LayoutB exports have no dollar share column. Dollar share is each row's
//! volume over the total volume of every data row, so the whole collection is
//! summed before any record is built.

use super::{ParseContext, RowDecision, RowParseOutcome};
use crate::app::models::{BrokerageRecord, Row};
use crate::app::services::normalizer::{
    PercentEncoding, normalize_percentage_scale, parse_numeric, parse_text,
};

/// Parse every LayoutB data row at once
///
/// Ranks follow parse order (1..N). Rows with a blank brand, or with both
/// shares zero, are skipped.
pub fn parse_layout_b_rows(rows: &[Row], ctx: &ParseContext<'_>) -> Vec<BrokerageRecord> {
    parse_outcome(rows, ctx).records
}

pub(crate) fn parse_outcome(rows: &[Row], ctx: &ParseContext<'_>) -> RowParseOutcome {
    let cols = &ctx.layout_b;

    // Blank-brand rows still count toward the market total
    let total_dollar_volume: f64 = rows
        .iter()
        .map(|row| parse_numeric(row.get(cols.dollar_volume)))
        .sum();

    let mut outcome = RowParseOutcome::with_capacity(rows.len());

    for row in rows {
        let brand = parse_text(row.get(cols.brand));
        if brand.is_empty() {
            outcome.record(RowDecision::BlankBrand);
            continue;
        }

        let dollar_volume = parse_numeric(row.get(cols.dollar_volume));
        let market_share_units = normalize_percentage_scale(
            parse_numeric(row.get(cols.market_percent)),
            PercentEncoding::Whole,
        );
        let market_share_dollar = if total_dollar_volume > 0.0 {
            dollar_volume / total_dollar_volume * 100.0
        } else {
            0.0
        };

        if market_share_dollar == 0.0 && market_share_units == 0.0 {
            outcome.record(RowDecision::Placeholder);
            continue;
        }

        let sale_to_list_ratio = normalize_percentage_scale(
            parse_numeric(row.get(cols.sale_to_list_ratio)),
            PercentEncoding::Whole,
        ) / 100.0;

        let rank = outcome.records.len() as u32 + 1;
        outcome.record(RowDecision::Kept(BrokerageRecord {
            rank,
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
            percent_change: 0.0,
        }));
    }

    outcome
}
