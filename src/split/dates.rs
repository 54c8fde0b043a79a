//! Date parsing and date format detection.
//!
//! Formats use strftime syntax (`%Y-%m-%d`). Detection matches the first
//! non-empty value against an ordered pattern table, then requires every
//! other value in the column to match the same pattern.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::error::SplitError;

/// Most mismatched values listed in a consistency error.
const MAX_REPORTED_MISMATCHES: usize = 5;

/// Candidate formats, most likely first. Day-first precedes month-first.
static FORMAT_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        // ISO
        ("%Y-%m-%d", r"^\d{4}-\d{1,2}-\d{1,2}$"),
        ("%Y-%m-%d %H:%M:%S", r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{2}:\d{2}$"),
        ("%Y-%m-%d %H:%M", r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{2}$"),
        // Day first
        ("%d/%m/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$"),
        ("%d/%m/%y", r"^\d{1,2}/\d{1,2}/\d{2}$"),
        ("%d-%m-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$"),
        ("%d-%m-%y", r"^\d{1,2}-\d{1,2}-\d{2}$"),
        ("%d.%m.%Y", r"^\d{1,2}\.\d{1,2}\.\d{4}$"),
        ("%d.%m.%y", r"^\d{1,2}\.\d{1,2}\.\d{2}$"),
        // Month first
        ("%m/%d/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$"),
        ("%m/%d/%y", r"^\d{1,2}/\d{1,2}/\d{2}$"),
        ("%m-%d-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$"),
        ("%m-%d-%y", r"^\d{1,2}-\d{1,2}-\d{2}$"),
        // Other
        ("%Y/%m/%d", r"^\d{4}/\d{1,2}/\d{1,2}$"),
        ("%Y.%m.%d", r"^\d{4}\.\d{1,2}\.\d{1,2}$"),
        ("%B %d, %Y", r"^[A-Za-z]+ \d{1,2}, \d{4}$"),
        ("%b %d, %Y", r"^[A-Za-z]+ \d{1,2}, \d{4}$"),
        ("%d %B %Y", r"^\d{1,2} [A-Za-z]+ \d{4}$"),
        ("%d %b %Y", r"^\d{1,2} [A-Za-z]+ \d{4}$"),
    ]
    .into_iter()
    .map(|(format, pattern)| (format, Regex::new(pattern).unwrap()))
    .collect()
});

/// Parse `value` with `format`, keeping only the date part.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(value, format))
        .ok()
}

/// Parse `value` with the first known format that accepts it.
///
/// Used when a column's format could not be detected up front.
pub fn parse_date_any(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    FORMAT_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(value))
        .find_map(|(format, _)| parse_date(value, format))
}

/// Detect the date format of a column.
///
/// `values` are `(line, value)` pairs for the non-empty cells of the column.
/// Returns `Ok(None)` when the first value matches no known format, and an
/// error when later values disagree with the format detected from the first.
pub fn detect_date_format(
    column: &str,
    values: &[(usize, &str)],
) -> Result<Option<&'static str>, SplitError> {
    let Some((_, first)) = values.first() else {
        return Err(SplitError::SheetConfig(format!(
            "Date column '{}' contains no valid data for format detection",
            column
        )));
    };

    let first = first.trim();
    let Some((format, pattern)) = FORMAT_PATTERNS
        .iter()
        .find(|(format, pattern)| pattern.is_match(first) && parse_date(first, format).is_some())
    else {
        tracing::warn!(
            "Could not detect date format for column '{}' from first value '{}'. \
             Consider providing explicit format with --date-format or in sheet config.",
            column,
            first
        );
        return Ok(None);
    };

    let mismatches: Vec<(usize, &str)> = values
        .iter()
        .map(|(line, value)| (*line, value.trim()))
        .filter(|(_, value)| !pattern.is_match(value) || parse_date(value, format).is_none())
        .collect();

    if !mismatches.is_empty() {
        let details = mismatches
            .iter()
            .take(MAX_REPORTED_MISMATCHES)
            .map(|(line, value)| format!("  Line {}: '{}'", line, value))
            .collect::<Vec<_>>()
            .join("\n");
        let truncated = if mismatches.len() > MAX_REPORTED_MISMATCHES {
            format!(" (showing first {})", MAX_REPORTED_MISMATCHES)
        } else {
            String::new()
        };
        return Err(SplitError::SheetConfig(format!(
            "Inconsistent date formats detected in column '{}'. \
             Detected format '{}' from first value, but found {} values that don't match this format:\n\
             {}{}\n\
             Please ensure all dates in the column use the same format, \
             or provide an explicit format with --date-format.",
            column,
            format,
            mismatches.len(),
            details,
            truncated
        )));
    }

    tracing::info!(
        "Detected date format '{}' for column '{}' (validated {} values)",
        format,
        column,
        values.len()
    );
    Ok(Some(*format))
}
