//! Split intervals and period naming.

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;

/// Time interval rows are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Interval {
    /// One file per calendar day.
    Day,
    /// One file per ISO week.
    Week,
    /// One file per calendar month.
    #[default]
    Month,
    /// One file per calendar year.
    Year,
    /// One file per financial year.
    FinancialYear,
}

impl Interval {
    /// Command-line names of every interval, in declaration order.
    pub fn names() -> Vec<String> {
        Self::value_variants()
            .iter()
            .filter_map(ValueEnum::to_possible_value)
            .map(|v| v.get_name().to_string())
            .collect()
    }

    /// Parse a command-line name (exact match).
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, false).ok()
    }

    /// Label of the period containing `date`, used in output file names.
    ///
    /// `fy_start` is the month (1-12) a financial year begins in.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use excelsior::split::Interval;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// assert_eq!(Interval::Month.period_key(date, 4), "2024-03");
    /// assert_eq!(Interval::FinancialYear.period_key(date, 4), "FY2023-2024");
    /// ```
    pub fn period_key(&self, date: NaiveDate, fy_start: u32) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => date.format("%Y-%m").to_string(),
            Self::Year => date.format("%Y").to_string(),
            Self::FinancialYear => {
                let start = if date.month() >= fy_start {
                    date.year()
                } else {
                    date.year() - 1
                };
                format!("FY{}-{}", start, start + 1)
            }
        }
    }
}
