//! Per-sheet configuration, sheet selection, and config resolution.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::error::Category;

use super::dates::detect_date_format;
use super::error::SplitError;
use super::table::Table;

/// Configuration for a single sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    /// Column holding the dates.
    #[serde(default)]
    pub date_column: Option<String>,
    /// strftime format of the dates.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Whether the sheet is processed.
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_include() -> bool {
    true
}

impl SheetConfig {
    fn normalize(&mut self, sheet: &str) -> Result<(), String> {
        if let Some(column) = self.date_column.as_mut() {
            let trimmed = column.trim();
            if trimmed.is_empty() {
                return Err(format!(
                    "{} -> date_column: Date column name cannot be empty or whitespace only",
                    sheet
                ));
            }
            *column = trimmed.to_string();
        }
        if let Some(format) = self.date_format.as_mut() {
            let trimmed = format.trim();
            if trimmed.is_empty() {
                return Err(format!(
                    "{} -> date_format: Date format cannot be empty or whitespace only",
                    sheet
                ));
            }
            if !trimmed.contains('%') {
                return Err(format!(
                    "{} -> date_format: Date format must contain datetime format specifiers (e.g., %Y, %m, %d)",
                    sheet
                ));
            }
            *format = trimmed.to_string();
        }
        Ok(())
    }
}

/// Sheet name to configuration mapping, as loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetConfigSet {
    sheets: BTreeMap<String, SheetConfig>,
}

impl SheetConfigSet {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SplitError> {
        let raw: BTreeMap<String, SheetConfig> =
            serde_json::from_str(json).map_err(config_error)?;
        Self::validated(raw)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, SplitError> {
        tracing::info!("Loading sheet configuration: {}", path.display());
        let file = File::open(path).map_err(|e| {
            SplitError::SheetConfig(format!("Error loading sheet configuration: {}", e))
        })?;
        let raw: BTreeMap<String, SheetConfig> =
            serde_json::from_reader(BufReader::new(file)).map_err(config_error)?;
        let set = Self::validated(raw)?;
        tracing::info!("Loaded configuration for {} sheets", set.len());
        Ok(set)
    }

    fn validated(raw: BTreeMap<String, SheetConfig>) -> Result<Self, SplitError> {
        let invalid = |msg: String| {
            SplitError::SheetConfig(format!("Invalid sheet configuration:\n  {}", msg))
        };

        if raw.is_empty() {
            return Err(invalid("Sheet configuration cannot be empty".to_string()));
        }

        let mut sheets = BTreeMap::new();
        for (name, mut config) in raw {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(invalid(
                    "Sheet names cannot be empty or whitespace only".to_string(),
                ));
            }
            config.normalize(&name).map_err(invalid)?;
            sheets.insert(name, config);
        }

        if !sheets.values().any(|c| c.include) {
            return Err(invalid(
                "At least one sheet must be included (have 'include': true or omit the 'include' field)"
                    .to_string(),
            ));
        }
        Ok(Self { sheets })
    }

    /// Configuration for one sheet.
    pub fn get(&self, sheet: &str) -> Option<&SheetConfig> {
        self.sheets.get(sheet)
    }

    /// Sheet names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

fn config_error(err: serde_json::Error) -> SplitError {
    let msg = match err.classify() {
        Category::Syntax | Category::Eof => format!("Invalid JSON in configuration file: {}", err),
        Category::Data => format!("Invalid sheet configuration:\n  {}", err),
        Category::Io => format!("Error loading sheet configuration: {}", err),
    };
    SplitError::SheetConfig(msg)
}

/// Effective settings for one sheet after merging global and sheet values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSheetConfig {
    pub date_column: String,
    /// `None` when no format was given and none could be detected.
    pub date_format: Option<String>,
}

/// Choose the sheets to process, sorted by name.
pub fn select_sheets(
    available: &[String],
    include: &[String],
    exclude: &[String],
    config: Option<&SheetConfigSet>,
) -> Result<Vec<String>, SplitError> {
    tracing::debug!(
        "Processing sheet selection from {} available sheets",
        available.len()
    );
    let mut selected: Vec<String> = available.to_vec();

    if !include.is_empty() {
        check_names(include, available, "include")?;
        selected.retain(|s| include.contains(s));
        tracing::debug!("Applied include filter: {} sheets remaining", selected.len());
    }

    if !exclude.is_empty() {
        check_names(exclude, available, "exclude")?;
        selected.retain(|s| !exclude.contains(s));
        tracing::debug!("Applied exclude filter: {} sheets remaining", selected.len());
    }

    if let Some(config) = config {
        selected.retain(|s| match config.get(s) {
            Some(c) if !c.include => {
                tracing::debug!("Sheet '{}' excluded by configuration", s);
                false
            }
            _ => true,
        });
        tracing::debug!("Applied config filters: {} sheets remaining", selected.len());
    }

    selected.sort();
    selected.dedup();

    if selected.is_empty() {
        return Err(SplitError::SheetConfig(
            "No sheets selected for processing after applying filters. \
             Check your include/exclude settings and sheet configuration."
                .to_string(),
        ));
    }

    tracing::info!(
        "Selected {} sheets for processing: {}",
        selected.len(),
        selected.join(", ")
    );
    Ok(selected)
}

fn check_names(names: &[String], available: &[String], filter: &str) -> Result<(), SplitError> {
    let invalid: Vec<&str> = names
        .iter()
        .filter(|n| !available.contains(n))
        .map(String::as_str)
        .collect();
    if invalid.is_empty() {
        return Ok(());
    }
    Err(SplitError::SheetConfig(format!(
        "Invalid sheet names in {} list: {}. Available sheets: {}",
        filter,
        invalid.join(", "),
        available.join(", ")
    )))
}

/// Merge global options with per-sheet configuration.
///
/// Sheet values override global ones. A missing format is detected from the
/// sheet's data when the date column is present.
pub fn resolve_sheet_configs(
    sheets: &[String],
    data: &BTreeMap<String, Table>,
    global_date_column: Option<&str>,
    global_date_format: Option<&str>,
    config: Option<&SheetConfigSet>,
) -> Result<BTreeMap<String, ResolvedSheetConfig>, SplitError> {
    let mut resolved = BTreeMap::new();

    for sheet in sheets {
        let specific = config.and_then(|c| c.get(sheet));
        let date_column = specific
            .and_then(|c| c.date_column.as_deref())
            .or(global_date_column)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                SplitError::SheetConfig(format!(
                    "No date column specified for sheet '{}'. \
                     Provide either --date-column or configure it in sheet config.",
                    sheet
                ))
            })?;
        let mut date_format = specific
            .and_then(|c| c.date_format.as_deref())
            .or(global_date_format)
            .map(str::to_string);

        if date_format.is_none() {
            if let Some(table) = data.get(sheet) {
                if let Some(index) = table.column_index(date_column) {
                    date_format = detect_date_format(date_column, &table.column_values(index))?
                        .map(str::to_string);
                }
            }
        }

        tracing::debug!(
            "Resolved config for '{}': date_column='{}', date_format='{}'",
            sheet,
            date_column,
            date_format.as_deref().unwrap_or("auto")
        );
        resolved.insert(
            sheet.clone(),
            ResolvedSheetConfig {
                date_column: date_column.to_string(),
                date_format,
            },
        );
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_and_trims_config() {
        let set = SheetConfigSet::from_json(
            r#"{" Sales ": {"date_column": " Date ", "date_format": " %Y-%m-%d "}, "Notes": {"include": false}}"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        let sales = set.get("Sales").unwrap();
        assert_eq!(sales.date_column.as_deref(), Some("Date"));
        assert_eq!(sales.date_format.as_deref(), Some("%Y-%m-%d"));
        assert!(sales.include);
        assert!(!set.get("Notes").unwrap().include);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SheetConfigSet::from_json(r#"{"Sales": {"date_col": "Date"}}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid sheet configuration"));
        assert!(err.to_string().contains("date_col"));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = SheetConfigSet::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON in configuration file"));
    }

    #[test]
    fn rejects_empty_and_all_excluded() {
        let err = SheetConfigSet::from_json("{}").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let err = SheetConfigSet::from_json(r#"{"A": {"include": false}}"#).unwrap_err();
        assert!(err.to_string().contains("At least one sheet must be included"));
    }

    #[test]
    fn rejects_blank_values() {
        let err = SheetConfigSet::from_json(r#"{"  ": {}}"#).unwrap_err();
        assert!(err.to_string().contains("Sheet names cannot be empty"));

        let err = SheetConfigSet::from_json(r#"{"A": {"date_column": "  "}}"#).unwrap_err();
        assert!(err.to_string().contains("A -> date_column"));

        let err = SheetConfigSet::from_json(r#"{"A": {"date_format": "YYYY"}}"#).unwrap_err();
        assert!(err.to_string().contains("format specifiers"));
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = SheetConfigSet::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert_eq!(err.kind(), crate::cli::ErrorKind::SheetConfig);
    }

    #[test]
    fn selection_applies_filters_and_sorts() {
        let available = names(&["Zeta", "Alpha", "Mid"]);
        assert_eq!(
            select_sheets(&available, &[], &[], None).unwrap(),
            names(&["Alpha", "Mid", "Zeta"])
        );
        assert_eq!(
            select_sheets(&available, &names(&["Zeta", "Mid"]), &[], None).unwrap(),
            names(&["Mid", "Zeta"])
        );
        assert_eq!(
            select_sheets(&available, &[], &names(&["Mid"]), None).unwrap(),
            names(&["Alpha", "Zeta"])
        );
    }

    #[test]
    fn selection_honours_config_include() {
        let config = SheetConfigSet::from_json(r#"{"Alpha": {"include": false}, "Mid": {}}"#)
            .unwrap();
        let available = names(&["Alpha", "Mid", "Zeta"]);
        assert_eq!(
            select_sheets(&available, &[], &[], Some(&config)).unwrap(),
            names(&["Mid", "Zeta"])
        );
    }

    #[test]
    fn selection_rejects_unknown_and_empty() {
        let available = names(&["Alpha"]);
        let err = select_sheets(&available, &names(&["Beta"]), &[], None).unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid sheet names in include list: Beta. Available sheets: Alpha"));

        let err = select_sheets(&available, &[], &names(&["Alpha"]), None).unwrap_err();
        assert!(err.to_string().starts_with("No sheets selected"));
    }

    #[test]
    fn resolution_prefers_sheet_values() {
        let config = SheetConfigSet::from_json(
            r#"{"Sales": {"date_column": "When", "date_format": "%d/%m/%Y"}}"#,
        )
        .unwrap();
        let resolved = resolve_sheet_configs(
            &names(&["Sales", "Other"]),
            &BTreeMap::new(),
            Some("Date"),
            Some("%Y-%m-%d"),
            Some(&config),
        )
        .unwrap();

        assert_eq!(resolved["Sales"].date_column, "When");
        assert_eq!(resolved["Sales"].date_format.as_deref(), Some("%d/%m/%Y"));
        assert_eq!(resolved["Other"].date_column, "Date");
        assert_eq!(resolved["Other"].date_format.as_deref(), Some("%Y-%m-%d"));
    }

    #[test]
    fn resolution_requires_date_column() {
        let err = resolve_sheet_configs(&names(&["Sales"]), &BTreeMap::new(), None, None, None)
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("No date column specified for sheet 'Sales'"));
    }

    #[test]
    fn resolution_detects_missing_format() {
        let mut data = BTreeMap::new();
        data.insert(
            "CSV".to_string(),
            Table::new(
                vec!["Date".into()],
                vec![vec!["31/01/2024".into()], vec!["01/02/2024".into()]],
            ),
        );
        let resolved =
            resolve_sheet_configs(&names(&["CSV"]), &data, Some("Date"), None, None).unwrap();
        assert_eq!(resolved["CSV"].date_format.as_deref(), Some("%d/%m/%Y"));
    }
}
