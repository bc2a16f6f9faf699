//! Market Share Processor Library
//!
//! A Rust library for ingesting real-estate brokerage market-share
//! spreadsheet exports and normalizing them into validated, report-ready
//! market records.
//!
//! This library provides tools for:
//! - Reading CSV and spreadsheet workbooks into a raw cell grid
//! - Detecting which of the known column layouts a file uses
//! - Normalizing currency, percentage and text cells from either layout
//! - Identifying the home brand across its naming aliases
//! - Ranking brokerages and raising data-quality warnings
//! - Assembling one market record per file, in parallel, with error isolation
//! - Building KPI summaries, chart series and export plans for report renderers

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod assembler;
        pub mod entity;
        pub mod format_detector;
        pub mod market_name;
        pub mod normalizer;
        pub mod ranking;
        pub mod report;
        pub mod row_parsers;
        pub mod sheet_reader;
        pub mod summary;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BrokerageRecord, Cell, FileFormat, FileStatus, MarketRecord, ShareType};
pub use app::services::assembler::{BatchProcessor, MarketRecordAssembler};
pub use config::Config;
pub use error::{Error, Result};
