//! Numeric and text normalization for raw spreadsheet cells
//!
//! Spreadsheet exports mix native numbers with formatted strings such as
//! `"$1,250,000"` or `"16.2%"`, and encode shares either as 0-1 decimals or
//! as whole percentages. The helpers here turn any of those into plain `f64`
//! values and never fail: unreadable input becomes `0.0`.

use crate::app::models::Cell;
use crate::constants::BYTE_ORDER_MARK;
use tracing::trace;

/// How a source column encodes percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentEncoding {
    /// Stored as a 0-1 fraction, e.g. `0.162`
    Decimal,
    /// Stored as a whole percentage, e.g. `16.2`
    Whole,
}

/// Parse a formatted numeric string
///
/// Removes `$`, `,` and `%` wherever they appear, trims whitespace, then
/// reads the longest leading decimal number. Trailing text after the number
/// is ignored, so `"45 days"` yields `45.0`.
pub fn parse_numeric_str(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();

    leading_number(cleaned.trim())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a cell into a finite number, `0.0` for anything unreadable
pub fn parse_numeric(cell: Option<&Cell>) -> f64 {
    match cell {
        None | Some(Cell::Empty) => 0.0,
        Some(Cell::Number(n)) if n.is_finite() => *n,
        Some(Cell::Number(_)) => 0.0,
        Some(Cell::Text(s)) => parse_numeric_str(s),
        // TRUE/FALSE carry no quantity
        Some(Cell::Bool(_)) => 0.0,
    }
}

/// Trimmed text content of a cell, empty for missing cells
pub fn parse_text(cell: Option<&Cell>) -> String {
    cell.map(|c| c.as_text().trim().to_string())
        .unwrap_or_default()
}

/// Bring a share onto the 0-100 scale
///
/// Values strictly between 0 and 1 are treated as fractions and multiplied by
/// 100 whatever the declared encoding; everything else passes through. The
/// open interval makes the operation safe to apply twice.
pub fn normalize_percentage_scale(value: f64, encoding: PercentEncoding) -> f64 {
    if value > 0.0 && value < 1.0 {
        let scaled = value * 100.0;
        trace!(
            "Rescaled fractional share {} to {} (declared encoding: {:?})",
            value, scaled, encoding
        );
        scaled
    } else {
        value
    }
}

/// Remove a leading byte-order mark
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

/// Longest prefix of `s` that reads as a decimal number
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if end < len && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = frac_end - frac_start;
        if int_digits > 0 || frac_digits > 0 {
            end = frac_end;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
