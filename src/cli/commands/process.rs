//! Process command implementation
//!
//! Loads configuration, discovers inputs, assembles one market record per
//! file on a bounded worker pool and prints the results.

use super::shared::{create_progress_bar, discover_inputs, load_configuration, setup_logging};
use crate::app::models::{FileStatus, MarketRecord, ShareType};
use crate::app::services::assembler::{
    BatchProcessor, BatchSummary, MarketRecordAssembler, TimestampIdGenerator,
};
use crate::app::services::report::{ChartSeries, ExportPlan};
use crate::app::services::summary::{KpiMetrics, executive_summary};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::{Error, Result};
use chrono::Utc;
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Narrative and KPIs for one reportable market
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub record_id: String,
    pub kpis: KpiMetrics,
    pub narrative: String,
    pub top_brokerages: ChartSeries,
}

/// Everything the process command reports
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub summary: BatchSummary,
    pub elapsed_seconds: f64,
    pub records: Vec<MarketRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_summaries: Option<Vec<MarketSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_plan: Option<ExportPlan>,
}

/// Process command runner
pub async fn run_process(args: ProcessArgs, cancel: CancellationToken) -> Result<BatchSummary> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(&args)?;
    setup_logging(&config.logging.level, args.quiet)?;

    info!("Starting market share processor");
    debug!("Loaded configuration: {:?}", config);

    let inputs = discover_inputs(&args.inputs)?;

    let assembler = MarketRecordAssembler::new(&config, Arc::new(TimestampIdGenerator::new()))?;
    let mut processor = BatchProcessor::new(Arc::new(assembler), config.processing.workers);

    let progress_bar = args
        .show_progress()
        .then(|| create_progress_bar(inputs.len() as u64, "Processing files..."));
    if let Some(pb) = &progress_bar {
        processor = processor.with_progress(pb.clone());
    }

    let records = processor.process_paths(inputs, cancel.clone()).await;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Processing complete");
    }
    if cancel.is_cancelled() {
        return Err(Error::processing_interrupted(
            "Processing interrupted by user",
        ));
    }

    let summary = BatchSummary::from_records(&records);
    info!("{}", summary);

    let market_summaries = args
        .summary
        .then(|| {
            build_market_summaries(&records, args.view, config.report.preview_chart_limit)
        });
    let export_plan = args.export_plan.map(|format| {
        ExportPlan::from_config(&records, format, Utc::now().date_naive(), &config.report)
    });

    let report = ProcessReport {
        summary,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
        records,
        market_summaries,
        export_plan,
    };

    match args.output_format {
        OutputFormat::Human => print_human_report(&report, start_time.elapsed()),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Csv => print_csv_report(&report.records)?,
    }

    Ok(summary)
}

/// KPIs, narrative and leading brokerages for every reportable market
///
/// A market that does not support `view` is summarised in its first
/// available view, the same one it would be rendered in.
pub fn build_market_summaries(
    records: &[MarketRecord],
    view: ShareType,
    chart_limit: usize,
) -> Vec<MarketSummary> {
    records
        .iter()
        .filter(|record| record.is_reportable())
        .filter_map(|record| {
            let effective = record.effective_view(view)?;
            KpiMetrics::for_market(record, effective).map(|kpis| MarketSummary {
                record_id: record.id().to_string(),
                kpis,
                narrative: executive_summary(record, effective),
                top_brokerages: ChartSeries::build(record, effective, chart_limit),
            })
        })
        .collect()
}

fn status_label(status: FileStatus) -> ColoredString {
    let label = format!("{:<8}", status.to_string());
    match status {
        FileStatus::Ready => label.bright_green().bold(),
        FileStatus::Warning => label.bright_yellow().bold(),
        FileStatus::Error => label.bright_red().bold(),
        FileStatus::Parsing | FileStatus::Validating => label.normal(),
    }
}

fn home_brand_line(record: &MarketRecord) -> String {
    let views = if record.available_metric_views().is_empty() {
        "no report views".to_string()
    } else {
        let names: Vec<String> = record
            .available_metric_views()
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("#1 by {}", names.join(", "))
    };

    match record.home_brand_record() {
        Some(home) => format!(
            "{} brokerages, home brand rank {} ({:.1}% dollar, {:.1}% units), {}",
            record.brokerages().len(),
            home.rank,
            home.market_share_dollar,
            home.market_share_units,
            views
        ),
        None => format!(
            "{} brokerages, home brand not found",
            record.brokerages().len()
        ),
    }
}

fn print_human_report(report: &ProcessReport, elapsed: Duration) {
    println!();
    println!("{}", "Market Share Processing Complete".bright_green().bold());
    println!("{}", "━".repeat(40));

    for record in &report.records {
        println!(
            "{} {} {} {}",
            status_label(record.status()),
            record.display_title().bright_cyan(),
            format!("[{}]", record.detected_format()).bright_black(),
            record.source_file_name().bright_black()
        );
        if record.status() != FileStatus::Error {
            println!("         {}", home_brand_line(record));
        }
        for warning in record.warning_messages() {
            println!("         {} {}", "!".bright_yellow(), warning);
        }
        for error in record.errors() {
            println!("         {} {}", "x".bright_red(), error);
        }
    }

    println!();
    println!("{}", report.summary.to_string().bold());
    println!("Processing time: {}", HumanDuration(elapsed));

    if let Some(summaries) = &report.market_summaries {
        print_market_summaries(summaries);
    }
    if let Some(plan) = &report.export_plan {
        print_export_plan(plan);
    }
    println!();
}

fn print_market_summaries(summaries: &[MarketSummary]) {
    if summaries.is_empty() {
        println!();
        println!("{}", "No reportable markets to summarize".bright_yellow());
        return;
    }

    for summary in summaries {
        println!();
        println!(
            "{} {}",
            summary.kpis.market.bright_cyan().bold(),
            format!("({} view)", summary.kpis.share_type).bright_black()
        );
        for (label, value) in summary.kpis.cards() {
            println!("   {:<16} {}", label, value);
        }
        println!("   {}", summary.narrative);
        print_top_brokerages(&summary.top_brokerages);
    }
}

fn print_top_brokerages(series: &ChartSeries) {
    for (position, bar) in series.bars.iter().enumerate() {
        let line = format!("{:>3}. {:<40} {:>5.1}%", position + 1, bar.name, bar.value);
        if bar.is_home_brand {
            println!("   {}", line.bright_green());
        } else {
            println!("   {}", line);
        }
    }
    if let Some(other) = series.other_share {
        let line = format!("{:>3}  {:<40} {:>5.1}%", "", "Other", other);
        println!("   {}", line.bright_black());
    }
}

fn print_export_plan(plan: &ExportPlan) {
    println!();
    println!(
        "{} {} ({} steps)",
        "Export plan:".bold(),
        plan.archive_name.bright_cyan(),
        plan.total_steps()
    );
    if plan.is_empty() {
        println!("   {}", "No reportable markets to export".bright_yellow());
    }
    for market in &plan.markets {
        println!("   {}: {}", market.market, market.artifacts.join(", "));
    }
}

fn print_json_report(report: &ProcessReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::output(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// One CSV line per record, in input order
pub fn write_csv_report<W: std::io::Write>(records: &[MarketRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record([
            "id",
            "source_file",
            "market",
            "format",
            "status",
            "brokerages",
            "home_rank",
            "home_share_dollar",
            "home_share_units",
            "views",
            "total_market_dollar",
            "total_market_units",
            "warnings",
            "errors",
        ])
        .map_err(|e| Error::csv("stdout", e))?;

    for record in records {
        let home = record.home_brand_record();
        let views: Vec<String> = record
            .available_metric_views()
            .iter()
            .map(ToString::to_string)
            .collect();
        writer
            .write_record([
                record.id().to_string(),
                record.source_file_name().to_string(),
                record.display_title().to_string(),
                record.detected_format().to_string(),
                record.status().to_string(),
                record.brokerages().len().to_string(),
                home.map(|h| h.rank.to_string()).unwrap_or_default(),
                home.map(|h| format!("{:.2}", h.market_share_dollar))
                    .unwrap_or_default(),
                home.map(|h| format!("{:.2}", h.market_share_units))
                    .unwrap_or_default(),
                views.join(";"),
                format!("{:.2}", record.total_market_dollar()),
                format!("{:.0}", record.total_market_units()),
                record.warning_messages().join("; "),
                record.errors().join("; "),
            ])
            .map_err(|e| Error::csv("stdout", e))?;
    }

    writer
        .flush()
        .map_err(|e| Error::io("Failed to flush CSV output", e))
}

fn print_csv_report(records: &[MarketRecord]) -> Result<()> {
    write_csv_report(records, std::io::stdout().lock())
}
