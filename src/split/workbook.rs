//! Excel workbook loading.
//!
//! Every sheet is read into a [`Table`] whose first row is the header row.
//! Sheets without data rows are skipped with a warning.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::NaiveTime;

use super::error::SplitError;
use super::table::Table;

/// Load the non-empty sheets of a workbook, in workbook order.
pub fn load_workbook(path: &Path) -> Result<Vec<(String, Table)>, SplitError> {
    let mut workbook = open_workbook_auto(path).map_err(read_error)?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(SplitError::DataLoad(format!(
            "Excel file contains no sheets: {}",
            path.display()
        )));
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name).map_err(read_error)?;
        match table_from_range(&range) {
            Some(table) => sheets.push((name, table)),
            None => tracing::warn!("Sheet '{}' is empty and will be skipped", name),
        }
    }

    if sheets.is_empty() {
        return Err(SplitError::DataLoad(format!(
            "All sheets in Excel file are empty: {}",
            path.display()
        )));
    }

    tracing::info!("Loaded Excel file with {} non-empty sheets", sheets.len());
    Ok(sheets)
}

fn read_error(err: impl std::fmt::Display) -> SplitError {
    SplitError::DataLoad(format!("Error reading Excel file: {}", err))
}

/// Convert a sheet range to a table, or `None` if it has no data rows.
///
/// Line numbers are spreadsheet row numbers.
fn table_from_range(range: &Range<Data>) -> Option<Table> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();

    let headers: Vec<String> = rows.next()?.iter().map(cell_text).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return None;
    }

    let data: Vec<(usize, Vec<String>)> = rows
        .enumerate()
        .map(|(i, row)| (first_row + i + 2, row.iter().map(cell_text).collect::<Vec<_>>()))
        .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
        .collect();
    if data.is_empty() {
        return None;
    }

    Some(Table::with_lines(headers, data))
}

/// Render a cell the way it would appear in a CSV export.
///
/// Native date cells become ISO dates, with a time part only when one is set.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ErrorKind;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_each_sheet_and_skips_empty_ones() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("book.xlsx");

        let mut workbook = Workbook::new();
        let sales = workbook.add_worksheet();
        sales.set_name("Sales").unwrap();
        sales.write_string(0, 0, "Date").unwrap();
        sales.write_string(0, 1, "Amount").unwrap();
        sales.write_string(1, 0, "2024-01-05").unwrap();
        sales.write_number(1, 1, 10).unwrap();
        sales.write_string(2, 0, "2024-02-07").unwrap();
        sales.write_number(2, 1, 2.5).unwrap();
        workbook.add_worksheet().set_name("Blank").unwrap();
        workbook.save(&path).unwrap();

        let sheets = load_workbook(&path).unwrap();
        assert_eq!(sheets.len(), 1);
        let (name, table) = &sheets[0];
        assert_eq!(name, "Sales");
        assert_eq!(table.headers(), &["Date", "Amount"]);
        assert_eq!(table.rows()[0], vec!["2024-01-05", "10"]);
        assert_eq!(table.rows()[1], vec!["2024-02-07", "2.5"]);
        assert_eq!(table.column_values(0), vec![(2, "2024-01-05"), (3, "2024-02-07")]);
    }

    #[test]
    fn native_dates_render_as_iso() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dates.xlsx");

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 3, 9).unwrap();
        sheet.write_with_format(1, 0, &date, &date_format).unwrap();
        workbook.save(&path).unwrap();

        let sheets = load_workbook(&path).unwrap();
        assert_eq!(sheets[0].1.rows()[0], vec!["2024-03-09"]);
    }

    #[test]
    fn all_empty_sheets_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        workbook.save(&path).unwrap();

        let err = load_workbook(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataLoad);
        assert!(err.to_string().contains("All sheets in Excel file are empty"));
    }

    #[test]
    fn corrupt_workbook_is_data_load_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.xlsx");
        fs::write(&path, "PK not really a zip").unwrap();

        let err = load_workbook(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataLoad);
        assert!(err.to_string().contains("Error reading Excel file"));
    }
}
