//! Splitting tabular files by date.
//!
//! A split loads the input, resolves which column holds the dates and in which
//! format, groups rows by [`Interval`] period, and writes one CSV per period.
//! Workbooks are split sheet by sheet.
//!
//! # Architecture
//!
//! - [`dates`] - Date parsing and format detection
//! - [`interval`] - Interval choices and period labels
//! - [`sheets`] - Sheet configuration, selection, and resolution
//! - [`table`] - CSV loading and writing
//! - [`workbook`] - Excel workbook loading
//! - [`error`] - [`SplitError`] and its failure categories

pub mod dates;
pub mod error;
pub mod interval;
pub mod sheets;
pub mod table;
pub mod workbook;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use error::{SplitError, SUPPORTED_EXTENSIONS};
pub use interval::Interval;
pub use sheets::{ResolvedSheetConfig, SheetConfig, SheetConfigSet};
pub use table::Table;

/// Sheet name used for CSV input unless a sheet config names it.
pub const CSV_SHEET_NAME: &str = "CSV";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./split_output";

/// Default first month of the financial year (April).
pub const DEFAULT_FY_START: u32 = 4;

/// Options for a single split run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    pub file: PathBuf,
    pub date_column: Option<String>,
    pub date_format: Option<String>,
    pub interval: Interval,
    /// First month (1-12) of the financial year.
    pub fy_start: u32,
    pub output_dir: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub sheet_config: Option<PathBuf>,
}

impl SplitOptions {
    /// Options for `file` with every other value at its default.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            date_column: None,
            date_format: None,
            interval: Interval::default(),
            fy_start: DEFAULT_FY_START,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            include: Vec::new(),
            exclude: Vec::new(),
            sheet_config: None,
        }
    }

    /// Check the option combination.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.date_column.is_none() && self.sheet_config.is_none() {
            return Err(SplitError::InvalidInput(
                "Either --date-column or --sheet-config must be provided".to_string(),
            ));
        }

        let selectors = self.sheet_selectors();
        if selectors.len() > 1 {
            return Err(SplitError::InvalidInput(format!(
                "Cannot use multiple sheet selection flags together: {}",
                selectors.join(", ")
            )));
        }

        if !(1..=12).contains(&self.fy_start) {
            return Err(SplitError::InvalidInput(format!(
                "Financial year start must be a month between 1 and 12, got {}",
                self.fy_start
            )));
        }
        Ok(())
    }

    fn sheet_selectors(&self) -> Vec<&'static str> {
        [
            (!self.include.is_empty(), "--include"),
            (!self.exclude.is_empty(), "--exclude"),
            (self.sheet_config.is_some(), "--sheet-config"),
        ]
        .into_iter()
        .filter_map(|(used, flag)| used.then_some(flag))
        .collect()
    }
}

/// Result of a completed split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Rows written across all output files.
    pub rows_written: usize,
    /// Rows skipped because their date cell was empty.
    pub rows_skipped: usize,
    /// Output files in period order.
    pub files: Vec<PathBuf>,
}

/// Lowercased extension of `path` with its leading dot.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Check the input path exists, is a file, and has a supported extension.
pub fn check_input_file(path: &Path) -> Result<(), SplitError> {
    if !path.exists() {
        return Err(SplitError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SplitError::NotAFile(path.to_path_buf()));
    }
    let extension = extension_of(path);
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SplitError::UnsupportedFormat {
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                extension
            },
        });
    }
    Ok(())
}

/// Run a split.
pub fn run(options: &SplitOptions) -> Result<SplitSummary, SplitError> {
    tracing::info!("Starting split command");
    options.validate()?;
    check_input_file(&options.file)?;

    tracing::info!("Input file: {}", options.file.display());
    if let Some(column) = &options.date_column {
        tracing::info!("Date column: {}", column);
    }
    tracing::info!("Split interval: {:?}", options.interval);
    tracing::info!("Output directory: {}", options.output_dir.display());
    if options.interval == Interval::FinancialYear {
        tracing::info!("Financial year starts in month: {}", options.fy_start);
    }

    let sheet_config = options
        .sheet_config
        .as_deref()
        .map(SheetConfigSet::load)
        .transpose()?;

    let is_csv = extension_of(&options.file) == ".csv";
    let (data, selected) = if is_csv {
        load_csv(options, sheet_config.as_ref())?
    } else {
        load_excel(options, sheet_config.as_ref())?
    };

    let resolved = sheets::resolve_sheet_configs(
        &selected,
        &data,
        options.date_column.as_deref(),
        options.date_format.as_deref(),
        sheet_config.as_ref(),
    )?;

    let stem = options
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "split".to_string());

    let mut summary = SplitSummary::default();
    for sheet in &selected {
        let (Some(table), Some(config)) = (data.get(sheet), resolved.get(sheet)) else {
            continue;
        };
        tracing::info!("Validating date column for sheet '{}'", sheet);
        let column = table.validate_date_column(&config.date_column)?;
        let groups = group_rows(table, column, config, options)?;
        summary.rows_skipped += table.len() - groups.values().map(Vec::len).sum::<usize>();

        fs::create_dir_all(&options.output_dir)?;
        for (period, rows) in &groups {
            let name = if is_csv {
                format!("{}_{}.csv", stem, period)
            } else {
                format!("{}_{}_{}.csv", stem, file_safe(sheet), period)
            };
            let path = options.output_dir.join(name);
            table.write_csv(&path, rows.iter().copied())?;
            tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
            summary.rows_written += rows.len();
            summary.files.push(path);
        }
    }

    tracing::info!("Split command execution completed successfully");
    Ok(summary)
}

type LoadedSheets = (BTreeMap<String, Table>, Vec<String>);

/// Load a CSV file as a single sheet.
///
/// The sheet takes its name from a single-entry sheet config, so that
/// config applies to it.
fn load_csv(
    options: &SplitOptions,
    sheet_config: Option<&SheetConfigSet>,
) -> Result<LoadedSheets, SplitError> {
    let filters: Vec<&str> = options
        .sheet_selectors()
        .into_iter()
        .filter(|flag| *flag != "--sheet-config")
        .collect();
    if !filters.is_empty() {
        tracing::warn!(
            "Excel-specific options {} will be ignored for CSV file",
            filters.join(", ")
        );
    }

    tracing::info!("Loading input file");
    let table = Table::from_csv_path(&options.file)?;

    let sheet_name = match sheet_config {
        Some(config) if config.len() == 1 => {
            let name = config.names().next().unwrap_or(CSV_SHEET_NAME).to_string();
            tracing::info!("Using sheet config name '{}' for CSV file", name);
            name
        }
        _ => {
            tracing::info!("Processing CSV file as single sheet");
            CSV_SHEET_NAME.to_string()
        }
    };
    let selected =
        sheets::select_sheets(std::slice::from_ref(&sheet_name), &[], &[], sheet_config)?;

    let mut data = BTreeMap::new();
    data.insert(sheet_name, table);
    Ok((data, selected))
}

/// Load every non-empty sheet of a workbook and apply the sheet filters.
fn load_excel(
    options: &SplitOptions,
    sheet_config: Option<&SheetConfigSet>,
) -> Result<LoadedSheets, SplitError> {
    tracing::info!("Loading input file");
    let loaded = workbook::load_workbook(&options.file)?;

    let available: Vec<String> = loaded.iter().map(|(name, _)| name.clone()).collect();
    tracing::info!("Excel file contains sheets: {}", available.join(", "));

    let selected = sheets::select_sheets(
        &available,
        &options.include,
        &options.exclude,
        sheet_config,
    )?;
    Ok((loaded.into_iter().collect(), selected))
}

/// Sheet name made safe for use in a file name.
fn file_safe(sheet: &str) -> String {
    sheet
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// Group the rows of `table` by period, keeping input order within a period.
fn group_rows<'a>(
    table: &'a Table,
    column: usize,
    config: &ResolvedSheetConfig,
    options: &SplitOptions,
) -> Result<BTreeMap<String, Vec<&'a Vec<String>>>, SplitError> {
    let mut groups: BTreeMap<String, Vec<&Vec<String>>> = BTreeMap::new();

    for (i, row) in table.rows().iter().enumerate() {
        let line = table.line(i);
        let value = row.get(column).map(|v| v.trim()).unwrap_or_default();
        if value.is_empty() {
            tracing::warn!("Skipping line {}: empty date in column '{}'", line, config.date_column);
            continue;
        }

        let date = match &config.date_format {
            Some(format) => dates::parse_date(value, format),
            None => dates::parse_date_any(value),
        }
        .ok_or_else(|| {
            SplitError::DataLoad(format!(
                "Could not parse date '{}' in column '{}' at line {}{}",
                value,
                config.date_column,
                line,
                config
                    .date_format
                    .as_deref()
                    .map(|f| format!(" using format '{}'", f))
                    .unwrap_or_default()
            ))
        })?;

        groups
            .entry(options.interval.period_key(date, options.fy_start))
            .or_default()
            .push(row);
    }

    Ok(groups)
}
