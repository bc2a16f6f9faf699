//! Injectable market record identifiers

use crate::constants::MARKET_ID_PREFIX;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique market record identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// `market-<unix-millis>-<counter>` identifiers
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    counter: AtomicU64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "{}-{}-{}",
            MARKET_ID_PREFIX,
            Utc::now().timestamp_millis(),
            sequence
        )
    }
}

/// `<prefix>-<counter>` identifiers for reproducible output
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new(MARKET_ID_PREFIX)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, sequence)
    }
}
