//! In-memory tabular data loaded from CSV or a workbook sheet.

use std::fs;
use std::path::Path;

use super::error::SplitError;

/// Maps byte offsets of record starts to 1-based line numbers.
///
/// A record's reported offset sits before any blank lines the reader skips,
/// so line terminators at the offset are stepped over first. Offsets must
/// be visited in increasing order.
struct LineCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    fn record_start(&mut self, byte: usize) -> usize {
        let mut end = byte.clamp(self.offset, self.bytes.len());
        while end < self.bytes.len() && matches!(self.bytes[end], b'\r' | b'\n') {
            end += 1;
        }
        self.line += self.bytes[self.offset..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.offset = end;
        self.line
    }
}

/// A header row plus data rows, all as strings.
///
/// Each row remembers the source line it was read from. Headers are kept
/// as written so output files reproduce them; lookups ignore surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    lines: Vec<usize>,
}

impl Table {
    /// Build a table from headers and rows.
    ///
    /// Rows are numbered as if read from a file with no blank lines, so the
    /// first data row is line 2.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let lines = (2..rows.len() + 2).collect();
        Self {
            headers,
            rows,
            lines,
        }
    }

    /// Build a table whose rows carry explicit source line numbers.
    pub(crate) fn with_lines(headers: Vec<String>, rows: Vec<(usize, Vec<String>)>) -> Self {
        let (lines, rows) = rows.into_iter().unzip();
        Self {
            headers,
            rows,
            lines,
        }
    }

    /// Load a CSV file. The first record is the header row.
    ///
    /// Ragged rows are accepted; missing cells read as empty. Rows are
    /// numbered by the file line they start on, so blank lines and quoted
    /// line breaks are accounted for.
    pub fn from_csv_path(path: &Path) -> Result<Self, SplitError> {
        let bytes = fs::read(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SplitError::DataLoad(format!(
                "CSV file is empty: {}",
                path.display()
            )));
        }

        let mut cursor = LineCursor::new(&bytes);
        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| cursor.record_start(p.byte() as usize))
                .unwrap_or(i + 2);
            rows.push((line, record.iter().map(str::to_string).collect()));
        }
        if rows.is_empty() {
            return Err(SplitError::DataLoad(format!(
                "CSV file is empty or contains no data: {}",
                path.display()
            )));
        }

        tracing::debug!(
            "Loaded {} rows and {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );
        Ok(Self::with_lines(headers, rows))
    }

    /// Column names, as written in the source.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Source line of the data row at `index`.
    pub fn line(&self, index: usize) -> usize {
        self.lines.get(index).copied().unwrap_or(index + 2)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header row, ignoring surrounding spaces.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        let column = column.trim();
        self.headers.iter().position(|h| h.trim() == column)
    }

    /// Non-empty cells of a column as `(line, value)` pairs.
    pub fn column_values(&self, index: usize) -> Vec<(usize, &str)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                row.get(index)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| (self.line(i), v))
            })
            .collect()
    }

    /// Check the date column exists and holds at least one value.
    pub fn validate_date_column(&self, column: &str) -> Result<usize, SplitError> {
        let Some(index) = self.column_index(column) else {
            let available: Vec<&str> = self.headers.iter().map(|h| h.trim()).collect();
            return Err(SplitError::SheetConfig(format!(
                "Date column '{}' not found. Available columns: {}",
                column,
                available.join(", ")
            )));
        };
        if self.column_values(index).is_empty() {
            return Err(SplitError::SheetConfig(format!(
                "Date column '{}' contains no valid data",
                column
            )));
        }
        Ok(index)
    }

    /// Write the header row and the given rows to `path`.
    pub fn write_csv<'a, I>(&self, path: &Path, rows: I) -> Result<(), SplitError>
    where
        I: IntoIterator<Item = &'a Vec<String>>,
    {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
