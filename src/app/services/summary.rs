//! Home brand KPIs and the executive summary narrative for one market

use crate::app::models::{BrokerageRecord, MarketRecord, ShareType, ValidationWarning};
use crate::constants::HOME_BRAND_DISPLAY_NAME;
use serde::Serialize;

/// Headline figures for the home brand in one market and view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub market: String,
    pub share_type: ShareType,
    pub brand: String,
    pub share: f64,
    pub dollar_volume: f64,
    pub market_share_dollar: f64,
    pub market_share_units: f64,
    pub total_sales: f64,
    pub avg_price: f64,
    pub days_on_market: f64,
    pub price_per_sq_ft: f64,
    pub sale_to_list_ratio: f64,
    /// Home share minus the best other brokerage's share, 0 without a runner-up
    pub gap_to_second: f64,
    pub second_place_name: Option<String>,
}

impl KpiMetrics {
    /// `None` when the market has no home brand row
    pub fn for_market(record: &MarketRecord, share_type: ShareType) -> Option<Self> {
        let home = record.home_brand_record()?;
        let share = home.share(share_type);
        let second = runner_up(record.brokerages(), share_type);

        Some(Self {
            market: record.display_title().to_string(),
            share_type,
            brand: home.name.clone(),
            share,
            dollar_volume: home.dollar_volume,
            market_share_dollar: home.market_share_dollar,
            market_share_units: home.market_share_units,
            total_sales: home.total_sales,
            avg_price: home.avg_price,
            days_on_market: home.days_on_market,
            price_per_sq_ft: home.price_per_sq_ft,
            sale_to_list_ratio: home.sale_to_list_ratio,
            gap_to_second: second.map_or(0.0, |b| share - b.share(share_type)),
            second_place_name: second.map(|b| b.name.clone()),
        })
    }

    /// Display rows for a KPI card grid; unknown values render as a dash
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        let optional = |value: f64, render: &dyn Fn(f64) -> String| {
            if value > 0.0 { render(value) } else { "-".to_string() }
        };

        vec![
            ("Dollar Volume", format_dollar(self.dollar_volume)),
            ("Total Sales", format_count(self.total_sales)),
            ("Avg Sale Price", format_dollar(self.avg_price)),
            (
                "Days on Market",
                optional(self.days_on_market, &|v| format!("{}", v.round())),
            ),
            (
                "Price / SqFt",
                optional(self.price_per_sq_ft, &|v| format!("${}", v.round())),
            ),
            (
                "SP / LP Ratio",
                optional(self.sale_to_list_ratio, &|v| format!("{:.1}%", v * 100.0)),
            ),
        ]
    }
}

/// Best non-home brokerage by the chosen share; earlier rows win ties
fn runner_up(brokerages: &[BrokerageRecord], share_type: ShareType) -> Option<&BrokerageRecord> {
    brokerages
        .iter()
        .filter(|b| !b.is_home_brand)
        .fold(None, |best: Option<&BrokerageRecord>, b| match best {
            Some(current) if current.share(share_type) >= b.share(share_type) => Some(current),
            _ => Some(b),
        })
}

/// Abbreviated dollar amount: `$1.23B`, `$4.5M`, `$500K`, `$999`
pub fn format_dollar(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Whole number with comma thousands separators
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Narrative paragraph describing the home brand's position in a market
pub fn executive_summary(record: &MarketRecord, share_type: ShareType) -> String {
    let market = record.display_title();

    let Some(metrics) = KpiMetrics::for_market(record, share_type) else {
        return format!(
            "Market data for {} has been processed. {} was not found in this dataset.",
            market,
            missing_brand_name(record)
        );
    };

    let mut position = format!(
        "{} commands {:.1}% of the {} market by {}",
        metrics.brand,
        metrics.share,
        market,
        share_type.label()
    );
    if share_type == ShareType::Dollar && metrics.dollar_volume > 0.0 {
        position.push_str(&format!(" ({})", format_dollar(metrics.dollar_volume)));
    }
    match &metrics.second_place_name {
        Some(second) if metrics.gap_to_second > 0.0 => position.push_str(&format!(
            ", leading {} by {:.1} percentage points.",
            second, metrics.gap_to_second
        )),
        _ => position.push('.'),
    }

    let mut parts = vec![position];

    let mut performance = Vec::new();
    if metrics.avg_price > 0.0 {
        performance.push(format!("an average sale price of {}", format_dollar(metrics.avg_price)));
    }
    if metrics.days_on_market > 0.0 {
        performance.push(format!("{} average days on market", metrics.days_on_market.round()));
    }
    if metrics.price_per_sq_ft > 0.0 {
        performance.push(format!("{}/sqft", format_dollar(metrics.price_per_sq_ft)));
    }
    if !performance.is_empty() {
        parts.push(format!(
            "With {}, {} maintains a premium market position among the top brokerages.",
            performance.join(", "),
            metrics.brand
        ));
    }

    if metrics.total_sales > 0.0 {
        parts.push(format!(
            "Across {} total transactions, the firm demonstrates consistent market leadership in the {} area.",
            format_count(metrics.total_sales),
            market
        ));
    }

    parts.join(" ")
}

fn missing_brand_name(record: &MarketRecord) -> &str {
    record
        .warnings()
        .iter()
        .find_map(|w| match w {
            ValidationWarning::HomeBrandMissing { brand } => Some(brand.as_str()),
            _ => None,
        })
        .unwrap_or(HOME_BRAND_DISPLAY_NAME)
}
