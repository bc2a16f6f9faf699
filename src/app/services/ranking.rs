//! Ranking and validation of parsed brokerage records
//!
//! Ordering never mutates the parsed records in place: sorting yields a new
//! vector and rank assignment is a separate mapping pass over it. Validation
//! only flags suspicious values; nothing is clamped or dropped here.

use crate::app::models::{BrokerageRecord, FileStatus, ShareType, ValidationWarning};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Ordered, ranked and validated brokerages for one market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMarket {
    /// Sorted by dollar share descending, ranked 1..N
    pub brokerages: Vec<BrokerageRecord>,

    /// Position of the first home brand record in `brokerages`
    pub home_brand_index: Option<usize>,

    pub is_home_brand_first_by_dollar: bool,
    pub is_home_brand_first_by_units: bool,

    /// Views where the home brand ranks #1, always in `[Dollar, Units]` order
    pub available_metric_views: Vec<ShareType>,

    pub warnings: Vec<ValidationWarning>,
}

impl RankedMarket {
    pub fn home_brand_record(&self) -> Option<&BrokerageRecord> {
        self.home_brand_index.and_then(|i| self.brokerages.get(i))
    }

    /// Warning when any advisory was raised, ready otherwise
    pub fn status(&self) -> FileStatus {
        if self.warnings.is_empty() {
            FileStatus::Ready
        } else {
            FileStatus::Warning
        }
    }
}

/// Sort, rank and validate the parsed records of one file
///
/// `brand_display_name` names the home brand in warning messages.
pub fn rank_and_validate(records: Vec<BrokerageRecord>, brand_display_name: &str) -> RankedMarket {
    let brokerages = assign_ranks(&sort_by_share(records, ShareType::Dollar));

    let is_home_brand_first_by_dollar = leader_is_home_brand(&brokerages, ShareType::Dollar);
    let is_home_brand_first_by_units = leader_is_home_brand(&brokerages, ShareType::Units);

    let available_metric_views: Vec<ShareType> = ShareType::ALL
        .into_iter()
        .filter(|view| match view {
            ShareType::Dollar => is_home_brand_first_by_dollar,
            ShareType::Units => is_home_brand_first_by_units,
        })
        .collect();

    let home_brand_index = brokerages.iter().position(|b| b.is_home_brand);

    let mut warnings = Vec::new();
    if home_brand_index.is_none() {
        warnings.push(ValidationWarning::HomeBrandMissing {
            brand: brand_display_name.to_string(),
        });
    }
    if available_metric_views.is_empty() {
        warnings.push(ValidationWarning::NoReportableView {
            brand: brand_display_name.to_string(),
        });
    }
    for brokerage in &brokerages {
        for share_type in ShareType::ALL {
            let value = brokerage.share(share_type);
            if value > 100.0 {
                warnings.push(ValidationWarning::ShareAboveHundred {
                    brokerage: brokerage.name.clone(),
                    share_type,
                    value,
                });
            }
        }
    }

    debug!(
        "Ranked {} brokerages: #1 by dollar = {}, #1 by units = {}, {} warnings",
        brokerages.len(),
        is_home_brand_first_by_dollar,
        is_home_brand_first_by_units,
        warnings.len()
    );

    RankedMarket {
        brokerages,
        home_brand_index,
        is_home_brand_first_by_dollar,
        is_home_brand_first_by_units,
        available_metric_views,
        warnings,
    }
}

/// New vector sorted by the given share, descending; ties keep input order
pub fn sort_by_share(records: Vec<BrokerageRecord>, share_type: ShareType) -> Vec<BrokerageRecord> {
    let mut sorted = records;
    sorted.sort_by(|a, b| descending(a.share(share_type), b.share(share_type)));
    sorted
}

/// Copy of the sequence with ranks 1..N in its current order
pub fn assign_ranks(records: &[BrokerageRecord]) -> Vec<BrokerageRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.with_rank(index as u32 + 1))
        .collect()
}

/// Plain sums of dollar volume and total sales
pub fn aggregate_totals(records: &[BrokerageRecord]) -> (f64, f64) {
    records.iter().fold((0.0, 0.0), |(dollar, units), record| {
        (dollar + record.dollar_volume, units + record.total_sales)
    })
}

fn leader_is_home_brand(records: &[BrokerageRecord], share_type: ShareType) -> bool {
    let mut by_share: Vec<&BrokerageRecord> = records.iter().collect();
    by_share.sort_by(|a, b| descending(a.share(share_type), b.share(share_type)));
    by_share.first().is_some_and(|leader| leader.is_home_brand)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRAND: &str = "Home Realty";

    fn record(name: &str, home: bool, dollar: f64, units: f64) -> BrokerageRecord {
        BrokerageRecord {
            rank: 99,
            name: name.to_string(),
            original_name: name.to_string(),
            is_home_brand: home,
            dollar_volume: dollar * 1_000.0,
            market_share_dollar: dollar,
            market_share_units: units,
            total_sales: units,
            avg_price: 500_000.0,
            days_on_market: 30.0,
            price_per_sq_ft: 300.0,
            sale_to_list_ratio: 0.97,
            percent_change: 0.0,
        }
    }

    #[test]
    fn test_sorted_and_ranked_by_dollar_share() {
        let ranked = rank_and_validate(
            vec![
                record("C", false, 10.0, 5.0),
                record("A", true, 40.0, 35.0),
                record("B", false, 25.0, 30.0),
            ],
            BRAND,
        );

        let names: Vec<&str> = ranked.brokerages.iter().map(|b| b.name.as_str()).collect();
        let ranks: Vec<u32> = ranked.brokerages.iter().map(|b| b.rank).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranked.status(), FileStatus::Ready);
        assert_eq!(ranked.available_metric_views, vec![ShareType::Dollar, ShareType::Units]);
        assert_eq!(ranked.home_brand_record().unwrap().name, "A");
    }

    #[test]
    fn test_ties_keep_parse_order() {
        let ranked = rank_and_validate(
            vec![
                record("First", false, 20.0, 10.0),
                record("Second", false, 20.0, 10.0),
                record("Home", true, 50.0, 50.0),
                record("Third", false, 20.0, 10.0),
            ],
            BRAND,
        );

        let names: Vec<&str> = ranked.brokerages.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "First", "Second", "Third"]);
        let ranks: Vec<u32> = ranked.brokerages.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_views_follow_each_metric_independently() {
        let ranked = rank_and_validate(
            vec![
                record("Home", true, 40.0, 20.0),
                record("Rival", false, 30.0, 45.0),
            ],
            BRAND,
        );

        assert!(ranked.is_home_brand_first_by_dollar);
        assert!(!ranked.is_home_brand_first_by_units);
        assert_eq!(ranked.available_metric_views, vec![ShareType::Dollar]);
        assert_eq!(ranked.status(), FileStatus::Ready);

        let units_only = rank_and_validate(
            vec![
                record("Rival", false, 60.0, 10.0),
                record("Home", true, 20.0, 50.0),
            ],
            BRAND,
        );
        assert_eq!(units_only.available_metric_views, vec![ShareType::Units]);
        assert_eq!(units_only.home_brand_index, Some(1));
    }

    #[test]
    fn test_missing_home_brand_warnings_in_order() {
        let ranked = rank_and_validate(
            vec![record("Rival", false, 60.0, 60.0), record("Other", false, 40.0, 40.0)],
            BRAND,
        );

        assert_eq!(
            ranked.warnings,
            vec![
                ValidationWarning::HomeBrandMissing {
                    brand: BRAND.to_string()
                },
                ValidationWarning::NoReportableView {
                    brand: BRAND.to_string()
                },
            ]
        );
        assert!(ranked.available_metric_views.is_empty());
        assert!(ranked.home_brand_record().is_none());
        assert_eq!(ranked.status(), FileStatus::Warning);
    }

    #[test]
    fn test_share_above_hundred_flagged_not_clamped() {
        let ranked = rank_and_validate(
            vec![record("Home", true, 142.0, 101.5), record("Rival", false, 10.0, 5.0)],
            BRAND,
        );

        assert_eq!(ranked.brokerages.len(), 2);
        assert_eq!(ranked.brokerages[0].market_share_dollar, 142.0);
        assert_eq!(ranked.warnings.len(), 2);

        let messages: Vec<String> = ranked.warnings.iter().map(ToString::to_string).collect();
        assert!(messages[0].contains("Home") && messages[0].contains("142"));
        assert!(messages[0].contains("dollar share"));
        assert!(messages[1].contains("unit share 101.5%"));
        assert_eq!(ranked.status(), FileStatus::Warning);
    }

    #[test]
    fn test_input_records_are_not_reranked_in_place() {
        let parsed = vec![record("B", false, 10.0, 10.0), record("A", true, 30.0, 30.0)];
        let ranked = assign_ranks(&sort_by_share(parsed.clone(), ShareType::Dollar));

        assert_eq!(parsed[0].rank, 99);
        assert_eq!(ranked[0].name, "A");
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn test_aggregate_totals() {
        let records = vec![record("A", true, 30.0, 3.0), record("B", false, 20.0, 2.0)];
        assert_eq!(aggregate_totals(&records), (50_000.0, 5.0));
        assert_eq!(aggregate_totals(&[]), (0.0, 0.0));
    }
}
