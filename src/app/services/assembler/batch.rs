//! Concurrent assembly of many files
//!
//! Each file is parsed on a blocking task, at most `workers` at a time, and
//! results are returned in submission order. A failing or panicking file
//! never affects the others.

use super::pipeline::{MarketRecordAssembler, panic_message};
use crate::app::models::{FileStatus, MarketRecord};
use crate::constants::CANCELLED_FILE_MESSAGE;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// One unit of batch work
enum BatchInput {
    Path(PathBuf),
    Source(SourceFile),
}

impl BatchInput {
    fn file_name(&self) -> String {
        match self {
            BatchInput::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            BatchInput::Source(source) => source.file_name.clone(),
        }
    }

    fn assemble(self, assembler: &MarketRecordAssembler) -> MarketRecord {
        match self {
            BatchInput::Path(path) => assembler.assemble_path(&path),
            BatchInput::Source(source) => {
                assembler.assemble_bytes(&source.file_name, &source.bytes)
            }
        }
    }
}

/// Runs the assembler over a batch of files with bounded concurrency
pub struct BatchProcessor {
    assembler: Arc<MarketRecordAssembler>,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl BatchProcessor {
    /// Create a batch processor; `workers` is raised to at least one
    pub fn new(assembler: Arc<MarketRecordAssembler>, workers: usize) -> Self {
        Self {
            assembler,
            workers: workers.max(1),
            progress: None,
        }
    }

    /// Advance `progress` once per finished file
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Assemble files from disk, one record per path in input order
    pub async fn process_paths(
        &self,
        paths: Vec<PathBuf>,
        cancel: CancellationToken,
    ) -> Vec<MarketRecord> {
        self.process(paths.into_iter().map(BatchInput::Path).collect(), cancel)
            .await
    }

    /// Assemble in-memory files, one record per source in input order
    pub async fn process_sources(
        &self,
        sources: Vec<SourceFile>,
        cancel: CancellationToken,
    ) -> Vec<MarketRecord> {
        self.process(sources.into_iter().map(BatchInput::Source).collect(), cancel)
            .await
    }

    async fn process(&self, inputs: Vec<BatchInput>, cancel: CancellationToken) -> Vec<MarketRecord> {
        info!(
            "Processing {} files with {} workers",
            inputs.len(),
            self.workers
        );
        let start_time = std::time::Instant::now();

        let records: Vec<MarketRecord> = stream::iter(inputs)
            .map(|input| {
                let assembler = Arc::clone(&self.assembler);
                let cancel = cancel.clone();
                let progress = self.progress.clone();
                async move {
                    let file_name = input.file_name();

                    let record = if cancel.is_cancelled() {
                        assembler.failed_record(&file_name, CANCELLED_FILE_MESSAGE)
                    } else {
                        if let Some(pb) = &progress {
                            pb.set_message(format!("Processing: {}", file_name));
                        }
                        let worker = Arc::clone(&assembler);
                        match task::spawn_blocking(move || input.assemble(&worker)).await {
                            Ok(record) => record,
                            Err(join_error) => {
                                let message = if join_error.is_panic() {
                                    panic_message(join_error.into_panic().as_ref())
                                } else {
                                    join_error.to_string()
                                };
                                assembler.failed_record(&file_name, message)
                            }
                        }
                    };

                    if let Some(pb) = &progress {
                        pb.inc(1);
                    }
                    record
                }
            })
            .buffered(self.workers)
            .collect()
            .await;

        let summary = BatchSummary::from_records(&records);
        debug!(
            "Batch finished in {:.2}s: {}",
            start_time.elapsed().as_secs_f64(),
            summary
        );

        records
    }
}

/// Status counts over a batch of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ready: usize,
    pub warning: usize,
    pub error: usize,

    /// Records with at least one available metric view
    pub reportable: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[MarketRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            match record.status() {
                FileStatus::Ready => summary.ready += 1,
                FileStatus::Warning => summary.warning += 1,
                FileStatus::Error => summary.error += 1,
                FileStatus::Parsing | FileStatus::Validating => {}
            }
            if record.is_reportable() {
                summary.reportable += 1;
            }
            summary
        })
    }

    pub fn has_errors(&self) -> bool {
        self.error > 0
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files: {} ready, {} warning, {} error, {} reportable",
            self.total, self.ready, self.warning, self.error, self.reportable
        )
    }
}
