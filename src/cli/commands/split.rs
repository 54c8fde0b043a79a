//! Split command implementation.
//!
//! The `excelsior split` command writes one CSV per time period of a date
//! column.

use std::path::PathBuf;

use crate::cli::{ArgumentSpec, CommandDescriptor, CommandResult, ParsedArgs};
use crate::split::{self, Interval, SplitOptions, SplitSummary, DEFAULT_OUTPUT_DIR};

/// Descriptor for `excelsior split`.
pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(
        "split",
        "Split Excel/CSV files based on dates in a specified column",
        handle,
    )
    .description(
        "Split Excel or CSV files into separate files based on dates contained \
         in a specified column. The data is partitioned according to the chosen \
         time interval (day, week, month, year, or financial year). Output files \
         are named <stem>_<period>.csv, or <stem>_<sheet>_<period>.csv for each \
         sheet of a workbook.",
    )
    .arg(
        ArgumentSpec::path("file")
            .alias("f")
            .required()
            .help("Path to the input Excel (.xlsx, .xls) or CSV file"),
    )
    .arg(
        ArgumentSpec::string("date-column")
            .alias("d")
            .value_name("COLUMN")
            .help("Name of the column containing dates (required unless --sheet-config)"),
    )
    .arg(
        ArgumentSpec::string("date-format")
            .alias("df")
            .value_name("FORMAT")
            .help("strftime format of the dates, e.g. %d/%m/%Y (detected if omitted)"),
    )
    .arg(
        ArgumentSpec::choice("interval", Interval::names())
            .alias("i")
            .default_value("month")
            .help("Time interval to split by"),
    )
    .arg(
        ArgumentSpec::choice("financial-year-start", (1..=12).map(|m: u32| m.to_string()))
            .alias("fys")
            .default_value("4")
            .value_name("MONTH")
            .help("Month the financial year starts in (used with --interval financial-year)"),
    )
    .arg(
        ArgumentSpec::path("output-dir")
            .alias("o")
            .default_value(DEFAULT_OUTPUT_DIR)
            .value_name("DIR")
            .help("Directory the split files are written to"),
    )
    .arg(
        ArgumentSpec::string("include")
            .alias("inc")
            .value_name("SHEETS")
            .help("Comma-separated sheet names to process"),
    )
    .arg(
        ArgumentSpec::string("exclude")
            .alias("exc")
            .value_name("SHEETS")
            .help("Comma-separated sheet names to skip"),
    )
    .arg(
        ArgumentSpec::path("sheet-config")
            .alias("sc")
            .value_name("PATH")
            .help("JSON file with per-sheet date column, format, and include settings"),
    )
    .example("excelsior split --file sales_data.csv --date-column \"Purchase Date\"")
    .example("excelsior split -f transactions.csv -d TransactionDate -i week -o ./weekly_data")
    .example("excelsior split -f events.csv -d EventDate -df %d/%m/%Y")
    .example("excelsior split -f ledger.csv -d \"Transaction Date\" -i financial-year -fys 7")
    .example("excelsior split -f workbook.xlsx -d Date --include Sales,Refunds")
    .example("excelsior split -f workbook.xlsx -sc sheet_config.json")
}

/// Handler for `excelsior split`.
pub fn handle(args: &ParsedArgs) -> CommandResult {
    let options = options_from_args(args);
    match split::run(&options) {
        Ok(summary) => CommandResult::success_with(success_message(&summary, &options)),
        Err(e) => {
            tracing::error!("Split command failed: {}", e);
            CommandResult::failure(e.kind(), e.to_string())
        }
    }
}

/// Build split options from resolved arguments.
pub fn options_from_args(args: &ParsedArgs) -> SplitOptions {
    let mut options = SplitOptions::new(args.path("file").map(PathBuf::from).unwrap_or_default());
    options.date_column = args.string("date-column").map(str::to_string);
    options.date_format = args.string("date-format").map(str::to_string);
    if let Some(interval) = args.string("interval").and_then(Interval::parse) {
        options.interval = interval;
    }
    if let Some(month) = args.string("financial-year-start").and_then(|m| m.parse().ok()) {
        options.fy_start = month;
    }
    if let Some(dir) = args.path("output-dir") {
        options.output_dir = dir.to_path_buf();
    }
    options.include = sheet_list(args.string("include"));
    options.exclude = sheet_list(args.string("exclude"));
    options.sheet_config = args.path("sheet-config").map(PathBuf::from);
    options
}

fn sheet_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn success_message(summary: &SplitSummary, options: &SplitOptions) -> String {
    let mut msg = format!(
        "Split {} rows into {} files in {}",
        summary.rows_written,
        summary.files.len(),
        options.output_dir.display()
    );
    if summary.rows_skipped > 0 {
        msg.push_str(&format!(
            " ({} rows with empty dates skipped)",
            summary.rows_skipped
        ));
    }
    msg
}
