//! End-to-end ingestion tests with real workbook and CSV files on disk
//!
//! Workbooks are generated with rust_xlsxwriter so calamine reads genuine
//! xlsx containers, not hand-built cell grids.

use market_share_processor::app::models::ValidationWarning;
use market_share_processor::app::services::assembler::{
    BatchSummary, SequentialIdGenerator, TimestampIdGenerator,
};
use market_share_processor::app::services::report::{ExportFormat, ExportPlan};
use market_share_processor::app::services::summary::executive_summary;
use market_share_processor::{
    BatchProcessor, Config, FileFormat, FileStatus, MarketRecord, MarketRecordAssembler, ShareType,
};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const HOME_BRAND: &str = "Russ Lyon Sotheby's International Realty";

const LAYOUT_A_HEADER: [&str; 17] = [
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

/// (brand, total $, dollar share, total #, unit share) as decimals
type LayoutARow<'a> = (&'a str, f64, f64, f64, f64);

fn write_layout_a_workbook(path: &Path, rows: &[LayoutARow]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in LAYOUT_A_HEADER.iter().enumerate() {
        if !header.is_empty() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
    }
    for (i, (brand, volume, share_dollar, units, share_units)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, row as f64).unwrap();
        sheet.write_string(row, 1, *brand).unwrap();
        sheet.write_number(row, 2, *volume).unwrap();
        sheet.write_number(row, 6, *share_dollar).unwrap();
        sheet.write_number(row, 8, *units).unwrap();
        sheet.write_number(row, 12, *share_units).unwrap();
        sheet.write_number(row, 13, 500_000.0).unwrap();
        sheet.write_number(row, 14, 0.98).unwrap();
        sheet.write_number(row, 15, 45.0).unwrap();
        sheet.write_number(row, 16, 250.0).unwrap();
    }
    workbook.save(path).unwrap();
}

fn write_layout_b_csv(path: &Path, rows: &[(&str, &str, &str, &str)]) {
    let mut content = String::from("#,Brokerage,Office,Volume,,,Units,,Mkt %,DOM,Avg Price,$/SqFt,SP/LP\n");
    for (brand, volume, units, market_percent) in rows {
        content.push_str(&format!(
            ",{},Main,\"{}\",,,{},,{},38,\"$612,000\",$401,97.1%\n",
            brand, volume, units, market_percent
        ));
    }
    std::fs::write(path, content).unwrap();
}

fn assembler() -> Arc<MarketRecordAssembler> {
    Arc::new(
        MarketRecordAssembler::new(&Config::default(), Arc::new(SequentialIdGenerator::new("it")))
            .unwrap(),
    )
}

/// Five files on disk; the third is a corrupt workbook
fn five_file_batch(dir: &Path) -> Vec<PathBuf> {
    let sedona = dir.join("MarketshareSedona.xlsx");
    write_layout_a_workbook(
        &sedona,
        &[
            (HOME_BRAND, 5_000_000.0, 0.25, 10.0, 0.30),
            ("Keller Williams", 3_000_000.0, 0.15, 8.0, 0.24),
        ],
    );

    let tubac = dir.join("MarketshareTubac.csv");
    write_layout_b_csv(
        &tubac,
        &[
            ("RLSIR", "$7,000,000", "12", "46.2%"),
            ("Long Realty", "$3,000,000", "9", "34.6%"),
        ],
    );

    let corrupt = dir.join("MarketshareDH.xlsx");
    std::fs::write(&corrupt, b"truncated upload, not a workbook").unwrap();

    let scottsdale = dir.join("MakretshareNorthScottsdaleLuxury.xlsx");
    write_layout_a_workbook(
        &scottsdale,
        &[
            ("Realty ONE Group", 9_000_000.0, 0.45, 20.0, 0.40),
            ("Russ Lyon", 4_000_000.0, 0.20, 9.0, 0.18),
        ],
    );

    let agents = dir.join("agent-roster.csv");
    std::fs::write(&agents, "Agent,Office,Closed\nPat,Main,4\n").unwrap();

    vec![sedona, tubac, corrupt, scottsdale, agents]
}

#[tokio::test]
async fn test_batch_with_corrupt_third_file() {
    let dir = TempDir::new().unwrap();
    let paths = five_file_batch(dir.path());

    let records = BatchProcessor::new(assembler(), 2)
        .process_paths(paths, CancellationToken::new())
        .await;

    assert_eq!(records.len(), 5);

    let sedona = &records[0];
    assert_eq!(sedona.detected_format(), FileFormat::LayoutA);
    assert_eq!(sedona.status(), FileStatus::Ready);
    assert_eq!(sedona.derived_market_name(), "Sedona");
    assert_eq!(sedona.available_metric_views(), &[ShareType::Dollar, ShareType::Units]);

    let tubac = &records[1];
    assert_eq!(tubac.detected_format(), FileFormat::LayoutB);
    assert_eq!(tubac.status(), FileStatus::Ready);
    let home = tubac.home_brand_record().unwrap();
    assert_eq!(home.name, HOME_BRAND);
    assert_eq!(home.original_name, "RLSIR");
    assert_eq!(home.market_share_dollar, 70.0);
    assert!((home.market_share_units - 46.2).abs() < 1e-9);
    assert!((home.sale_to_list_ratio - 0.971).abs() < 1e-9);
    assert_eq!(home.avg_price, 612_000.0);

    let corrupt = &records[2];
    assert_eq!(corrupt.status(), FileStatus::Error);
    assert_eq!(corrupt.errors().len(), 1);
    assert!(corrupt.errors()[0].contains("MarketshareDH.xlsx"));
    assert!(corrupt.brokerages().is_empty());
    assert!(corrupt.available_metric_views().is_empty());
    assert_eq!(corrupt.derived_market_name(), "Desert Highlands");

    let scottsdale = &records[3];
    assert_eq!(scottsdale.derived_market_name(), "North Scottsdale Luxury");
    assert_eq!(scottsdale.status(), FileStatus::Warning);
    assert!(scottsdale.warnings().iter().any(|w| matches!(w, ValidationWarning::NoReportableView { .. })));
    assert_eq!(scottsdale.home_brand_record().unwrap().rank, 2);

    let agents = &records[4];
    assert_eq!(agents.detected_format(), FileFormat::Unknown);
    assert_eq!(agents.status(), FileStatus::Error);

    let summary = BatchSummary::from_records(&records);
    assert_eq!(summary.to_string(), "5 files: 2 ready, 1 warning, 2 error, 2 reportable");
}

#[tokio::test]
async fn test_record_status_invariants_hold_across_batch() {
    let dir = TempDir::new().unwrap();
    let paths = five_file_batch(dir.path());

    let records = BatchProcessor::new(assembler(), 4)
        .process_paths(paths, CancellationToken::new())
        .await;

    for record in &records {
        match record.status() {
            FileStatus::Ready => {
                assert!(record.errors().is_empty());
                assert!(!record.available_metric_views().is_empty());
            }
            FileStatus::Error => {
                assert!(record.available_metric_views().is_empty());
                assert!(record.brokerages().is_empty());
            }
            _ => {}
        }
        let ranks: Vec<u32> = record.brokerages().iter().map(|b| b.rank).collect();
        let expected: Vec<u32> = (1..=ranks.len() as u32).collect();
        assert_eq!(ranks, expected);
    }
}

#[tokio::test]
async fn test_ids_unique_with_timestamp_generator() {
    let dir = TempDir::new().unwrap();
    let paths = five_file_batch(dir.path());
    let assembler = MarketRecordAssembler::new(&Config::default(), Arc::new(TimestampIdGenerator::new()))
        .unwrap();

    let records = BatchProcessor::new(Arc::new(assembler), 5)
        .process_paths(paths, CancellationToken::new())
        .await;

    let mut ids: Vec<&str> = records.iter().map(MarketRecord::id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert!(ids.iter().all(|id| id.starts_with("market-")));
}

#[tokio::test]
async fn test_reports_from_ingested_files() {
    let dir = TempDir::new().unwrap();
    let records = BatchProcessor::new(assembler(), 2)
        .process_paths(five_file_batch(dir.path()), CancellationToken::new())
        .await;

    let narrative = executive_summary(&records[1], ShareType::Dollar);
    assert!(narrative.starts_with(&format!(
        "{} commands 70.0% of the Tubac market by dollar volume ($7.0M), leading Long Realty by 40.0 percentage points.",
        HOME_BRAND
    )));

    let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let plan = ExportPlan::for_records(&records, ExportFormat::Both, date);
    assert_eq!(plan.archive_name, "Market-Reports-2026-10-18.zip");
    assert_eq!(
        plan.artifact_names().collect::<Vec<_>>(),
        vec!["Sedona.png", "Sedona.pdf", "Tubac.png", "Tubac.pdf"]
    );
}

#[test]
fn test_alias_configuration_from_toml() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[home_brand]\nextra_aliases = [\"desert\\\\s*luxe\"]\n",
    )
    .unwrap();
    let config = Config::load(Some(&config_path)).unwrap();

    let workbook = dir.path().join("MarketshareCarefreeCaveCreekArea.xlsx");
    write_layout_a_workbook(
        &workbook,
        &[
            ("Desert Luxe Properties", 2_000_000.0, 0.5, 4.0, 0.5),
            ("Keller Williams", 1_000_000.0, 0.25, 3.0, 0.375),
        ],
    );

    let assembler =
        MarketRecordAssembler::new(&config, Arc::new(SequentialIdGenerator::default())).unwrap();
    let record = assembler.assemble_path(&workbook);

    assert_eq!(record.derived_market_name(), "Carefree/Cave Creek Area");
    assert_eq!(record.status(), FileStatus::Ready);
    let home = record.home_brand_record().unwrap();
    assert_eq!(home.name, HOME_BRAND);
    assert_eq!(home.original_name, "Desert Luxe Properties");
}
