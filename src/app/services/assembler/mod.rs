//! Market record assembly
//!
//! This module turns uploaded files into [`MarketRecord`](crate::app::models::MarketRecord)s.
//!
//! # Architecture
//!
//! - [`pipeline`] - [`MarketRecordAssembler`], the per-file read → detect →
//!   parse → rank pipeline with error isolation
//! - [`id_generator`] - injectable record identifiers
//! - [`batch`] - [`BatchProcessor`], bounded-concurrency assembly of many files
//!
//! # Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use market_share_processor::app::services::assembler::{
//!     MarketRecordAssembler, TimestampIdGenerator,
//! };
//! use market_share_processor::config::Config;
//!
//! # fn example() -> market_share_processor::Result<()> {
//! let assembler = MarketRecordAssembler::new(
//!     &Config::default(),
//!     Arc::new(TimestampIdGenerator::new()),
//! )?;
//!
//! let record = assembler.assemble_bytes("MarketshareSedona.csv", b"Brand\nAlpha\n");
//! println!("{}: {}", record.display_title(), record.status());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod id_generator;
pub mod pipeline;

#[cfg(test)]
pub mod tests;

pub use batch::{BatchProcessor, BatchSummary, SourceFile};
pub use id_generator::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use pipeline::MarketRecordAssembler;
