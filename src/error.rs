//! Error handling for market share ingestion.
//!
//! Per-file failures (unreadable workbooks, unknown layouts, empty sheets) are
//! converted into error-status market records at the assembler boundary. The
//! variants below therefore surface to callers only from configuration,
//! report gating and CLI plumbing.

use crate::app::models::ShareType;
use thiserror::Error;

/// Result type alias for the market share processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for market share processing operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading error
    #[error("CSV parsing error in file '{file}': {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Workbook could not be opened or read
    #[error("Could not read workbook '{file}': {message}")]
    Workbook { file: String, message: String },

    /// File extension is not a supported spreadsheet type
    #[error("Unsupported file type for '{file}': expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods")]
    UnsupportedFile { file: String },

    /// Header row matches no known layout
    #[error("Unrecognized file format. Expected LayoutA or LayoutB headers.")]
    UnrecognizedFormat,

    /// Too few rows, or no row survived filtering
    #[error("{reason}")]
    EmptyData { reason: String },

    /// A per-format column map failed validation
    #[error("Invalid column map for {layout}: {message}")]
    InvalidColumnMap { layout: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A report was requested for a view the market cannot support
    #[error("Report unavailable for '{market}' ({share_type} view): {reason}")]
    ReportUnavailable {
        market: String,
        share_type: ShareType,
        reason: String,
    },

    /// Rendered image failed the export contract
    #[error("Rendered image for '{market}' rejected: {reason}")]
    ImageValidation { market: String, reason: String },

    /// Export packager failed
    #[error("Export packaging failed: {message}")]
    Packaging { message: String },

    /// Report output could not be written
    #[error("Failed to write output: {message}")]
    Output { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error for a named file
    pub fn csv(file: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            file: file.into(),
            source,
        }
    }

    /// Create a workbook error
    pub fn workbook(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workbook {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported file type error
    pub fn unsupported_file(file: impl Into<String>) -> Self {
        Self::UnsupportedFile { file: file.into() }
    }

    /// Create an empty data error
    pub fn empty_data(reason: impl Into<String>) -> Self {
        Self::EmptyData {
            reason: reason.into(),
        }
    }

    /// Create a column map validation error
    pub fn invalid_column_map(layout: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidColumnMap {
            layout: layout.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a report unavailable error
    pub fn report_unavailable(
        market: impl Into<String>,
        share_type: ShareType,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReportUnavailable {
            market: market.into(),
            share_type,
            reason: reason.into(),
        }
    }

    /// Create an image validation error
    pub fn image_validation(market: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageValidation {
            market: market.into(),
            reason: reason.into(),
        }
    }

    /// Create a packaging error
    pub fn packaging(message: impl Into<String>) -> Self {
        Self::Packaging {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Check if an error is critical enough to stop a whole run
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::InvalidColumnMap { .. }
                | Error::ProcessingInterrupted { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::Workbook {
            file: "unknown".to_string(),
            message: error.to_string(),
        }
    }
}
