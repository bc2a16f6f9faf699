//! Application constants for the market share processor
//!
//! Column maps, header markers, home brand aliases and report defaults used
//! throughout the ingestion pipeline.

// =============================================================================
// Home Brand
// =============================================================================

/// Case-insensitive patterns identifying the home brand, evaluated in order
pub const HOME_BRAND_PATTERNS: &[&str] = &[r"sotheby", r"rlsir", r"russ\s*lyon"];

/// Canonical display name for every home brand alias
pub const HOME_BRAND_DISPLAY_NAME: &str = "Russ Lyon Sotheby's International Realty";

// =============================================================================
// Format Detection
// =============================================================================

/// Header index checked for the LayoutB "Mkt %" marker
pub const MARKET_PERCENT_HEADER_INDEX: usize = 8;

/// LayoutB marker pattern (checked first, at a fixed column)
pub const MARKET_PERCENT_HEADER_PATTERN: &str = r"(?i)mkt\s*%";

/// LayoutA marker patterns (any header cell)
pub const MARKET_SHARE_HEADER_PATTERNS: &[&str] = &[
    r"(?i)market\s*share\s*\(\$\)",
    r"(?i)market\s*share\s*\(#\)",
];

/// Byte-order mark tolerated at the start of the first header cell
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

// =============================================================================
// Column Maps
// =============================================================================

/// LayoutA column indices ("Market Share ($)" / "Market Share (#)" exports)
pub mod layout_a {
    pub const RANK: usize = 0;
    pub const BRAND: usize = 1;
    /// Total ($)
    pub const DOLLAR_VOLUME: usize = 2;
    /// % Chg
    pub const PERCENT_CHANGE: usize = 3;
    /// Market Share ($)
    pub const MARKET_SHARE_DOLLAR: usize = 6;
    /// Total (#)
    pub const TOTAL_SALES: usize = 8;
    /// Market Share (#)
    pub const MARKET_SHARE_UNITS: usize = 12;
    pub const AVG_PRICE: usize = 13;
    /// SP/LP
    pub const SALE_TO_LIST_RATIO: usize = 14;
    /// DOM
    pub const DAYS_ON_MARKET: usize = 15;
    /// $/SqFt
    pub const PRICE_PER_SQ_FT: usize = 16;
}

/// LayoutB column indices ("Mkt %" exports without a dollar share column)
pub mod layout_b {
    pub const BRAND: usize = 1;
    pub const DOLLAR_VOLUME: usize = 3;
    pub const TOTAL_SALES: usize = 6;
    /// Mkt %, the unit share
    pub const MARKET_PERCENT: usize = 8;
    pub const DAYS_ON_MARKET: usize = 9;
    pub const AVG_PRICE: usize = 10;
    pub const PRICE_PER_SQ_FT: usize = 11;
    pub const SALE_TO_LIST_RATIO: usize = 12;
}

// =============================================================================
// Input Files
// =============================================================================

/// Spreadsheet extensions read through calamine
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Delimited text extensions read through the csv crate
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Minimum number of rows (header + one data row) for a usable sheet
pub const MIN_SHEET_ROWS: usize = 2;

// =============================================================================
// Assembly Messages
// =============================================================================

/// Error for sheets with a header and nothing else
pub const NO_DATA_ROWS_MESSAGE: &str = "File has no data rows";

/// Error for sheets where every data row was discarded
pub const NO_VALID_ROWS_MESSAGE: &str = "No valid brokerage data found";

/// Error for batch files skipped after cancellation
pub const CANCELLED_FILE_MESSAGE: &str = "Processing cancelled before this file was parsed";

/// Prefix of generated market record identifiers
pub const MARKET_ID_PREFIX: &str = "market";

// =============================================================================
// Reports and Export
// =============================================================================

/// Brokerages shown in a preview chart
pub const MAX_BROKERAGES_PREVIEW: usize = 15;

/// Brokerages shown in an exported chart
pub const MAX_BROKERAGES_EXPORT: usize = 10;

/// Residual share below which the "Other" bucket is omitted
pub const OTHER_SHARE_THRESHOLD: f64 = 0.5;

/// Smallest rendered page image accepted for export, in bytes
pub const MIN_RENDERED_IMAGE_BYTES: usize = 1000;

/// PNG file signature
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Prefix of batch archive names
pub const ARCHIVE_NAME_PREFIX: &str = "Market-Reports";

/// Advisory attached to rejected exports
pub const DO_NOT_DISTRIBUTE_MESSAGE: &str =
    "Something looks off. Do not distribute this report.";

// =============================================================================
// Configuration
// =============================================================================

/// Application directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "market-share";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the worker count
pub const ENV_WORKERS: &str = "MARKET_SHARE_WORKERS";

/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "MARKET_SHARE_LOG_LEVEL";

/// Environment variable overriding the home brand display name
pub const ENV_BRAND_NAME: &str = "MARKET_SHARE_BRAND_NAME";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";
