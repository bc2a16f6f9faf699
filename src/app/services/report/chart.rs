//! Report gate and chart series

use crate::app::models::{MarketRecord, ShareType};
use crate::constants::OTHER_SHARE_THRESHOLD;
use crate::error::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Chart styles a renderer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    Bar,
    Treemap,
    Sankey,
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VisualizationKind::Bar => "bar",
            VisualizationKind::Treemap => "treemap",
            VisualizationKind::Sankey => "sankey",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for VisualizationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(VisualizationKind::Bar),
            "treemap" => Ok(VisualizationKind::Treemap),
            "sankey" => Ok(VisualizationKind::Sankey),
            other => Err(Error::configuration(format!(
                "unknown visualization '{}', expected bar, treemap or sankey",
                other
            ))),
        }
    }
}

/// A render request that has passed the reportability gate
///
/// Only [`ReportRequest::new`] creates one, so a renderer never sees a view
/// the market does not support.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    record_id: String,
    market: String,
    share_type: ShareType,
    kind: VisualizationKind,
}

impl ReportRequest {
    pub fn new(record: &MarketRecord, share_type: ShareType, kind: VisualizationKind) -> Result<Self> {
        let market = record.display_title();

        if !record.is_reportable() {
            let reason = match record.errors().first() {
                Some(error) => error.clone(),
                None => format!("market is not reportable (status {})", record.status()),
            };
            return Err(Error::report_unavailable(market, share_type, reason));
        }

        if !record.supports_view(share_type) {
            return Err(Error::report_unavailable(
                market,
                share_type,
                format!("home brand is not #1 by {}", share_type.label()),
            ));
        }

        Ok(Self {
            record_id: record.id().to_string(),
            market: market.to_string(),
            share_type,
            kind,
        })
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Display title at the time of the request
    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn share_type(&self) -> ShareType {
        self.share_type
    }

    pub fn kind(&self) -> VisualizationKind {
        self.kind
    }
}

/// One brokerage in a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub name: String,
    pub value: f64,
    pub is_home_brand: bool,
}

/// Top brokerages by one share metric, plus the residual "Other" share
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub title: String,
    pub share_type: ShareType,
    pub bars: Vec<ChartBar>,
    /// `100 - sum(bars)`, present only above the display threshold
    pub other_share: Option<f64>,
}

impl ChartSeries {
    /// Top `max` brokerages by `share_type`, ties keep dollar-rank order
    pub fn build(record: &MarketRecord, share_type: ShareType, max: usize) -> Self {
        let mut ordered: Vec<_> = record.brokerages().iter().collect();
        ordered.sort_by(|a, b| {
            b.share(share_type)
                .partial_cmp(&a.share(share_type))
                .unwrap_or(Ordering::Equal)
        });

        let bars: Vec<ChartBar> = ordered
            .into_iter()
            .take(max)
            .map(|b| ChartBar {
                name: b.name.clone(),
                value: b.share(share_type),
                is_home_brand: b.is_home_brand,
            })
            .collect();

        let top_total: f64 = bars.iter().map(|bar| bar.value).sum();
        let residual = (100.0 - top_total).max(0.0);

        Self {
            title: record.display_title().to_string(),
            share_type,
            bars,
            other_share: (residual > OTHER_SHARE_THRESHOLD).then_some(residual),
        }
    }

    pub fn home_brand_bar(&self) -> Option<&ChartBar> {
        self.bars.iter().find(|bar| bar.is_home_brand)
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
