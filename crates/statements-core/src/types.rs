//! Core data types for statement normalization.
//!
//! This module defines the fundamental data structures:
//!
//! - [`StatementKind`] - One of the three major financial statements
//! - [`FilingRecord`] - A single filing from a company's filings list
//! - [`StatementLinkMap`] - Statement kind mapped to a document URL
//! - [`RawStatementTable`] - Role-tagged cells of one rendered statement table
//! - [`CanonicalStatement`] - A parsed as-reported statement
//! - [`StandardizedMatrix`] - A numeric element-by-period matrix

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, StatementError};

/// One of the three major financial statements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Statement of income / operations / earnings.
    IncomeStatement,
    /// Balance sheet / statement of financial position.
    BalanceSheet,
    /// Statement of cash flows.
    CashFlow,
}

impl StatementKind {
    /// Returns the canonical snake_case name of this statement.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single filing from a company's filings list.
///
/// Read-only value created when the filings list is deserialized; many
/// records exist per company.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    /// Accession number with dashes stripped.
    pub accession_number: String,
    /// Form type of the filing (e.g., "10-K").
    pub form_type: String,
    /// Primary document filename.
    pub primary_document: String,
    /// Date the filing was made.
    pub filing_date: NaiveDate,
}

/// Statement kind mapped to a fully qualified document URL.
///
/// Built fresh per filing by the link classifier and discarded after the
/// corresponding tables are parsed. A missing key means the filing's exhibit
/// index had no match for that statement; absence is surfaced downstream.
pub type StatementLinkMap = HashMap<StatementKind, String>;

/// The unparsed cells of one rendered statement table, grouped by the
/// structural role each cell was tagged with.
///
/// Invariant: `values.len()` must be an integer multiple of `labels.len()`.
/// A violation is a data-quality fault in the source document, surfaced as
/// [`StatementError::StructuralMismatch`] when the table is parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawStatementTable {
    /// Period header cells in document order (duration labels then dates).
    pub headers: Vec<String>,
    /// The single title cell, `"<name> - <unit>"`.
    pub title: String,
    /// Element (line item) label cells in document order.
    pub labels: Vec<String>,
    /// Value cells in document order, date-major.
    pub values: Vec<String>,
}

/// A parsed as-reported financial statement.
///
/// `elements` keeps original document order and may contain duplicates
/// (repeated line items are legal). Each per-date value slice is positional:
/// consumers zip `elements` with the slice, they must not re-sort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStatement {
    /// Statement title, e.g. "CONSOLIDATED STATEMENTS OF OPERATIONS".
    pub title: String,
    /// Reporting unit, e.g. "USD ($) $ in Millions".
    pub unit: String,
    /// Ordered element (line item) labels.
    pub elements: Vec<String>,
    /// Duration label mapped to date label mapped to one raw value string
    /// per element.
    pub periods: HashMap<String, HashMap<String, Vec<String>>>,
}

impl CanonicalStatement {
    /// Returns the per-element values for one (duration, date) period column.
    #[must_use]
    pub fn values(&self, duration: &str, date: &str) -> Option<&[String]> {
        self.periods
            .get(duration)
            .and_then(|by_date| by_date.get(date))
            .map(Vec::as_slice)
    }

    /// Returns a copy with digit-only extraction applied to every value cell.
    ///
    /// This is the statement-agnostic cleanup pass: footnote markers,
    /// thousands separators, and parenthesis-negative markers are discarded
    /// uniformly. Element labels are never touched.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let periods = self
            .periods
            .iter()
            .map(|(duration, by_date)| {
                let by_date = by_date
                    .iter()
                    .map(|(date, values)| {
                        let values = values.iter().map(|v| extract_digits(v)).collect();
                        (date.clone(), values)
                    })
                    .collect();
                (duration.clone(), by_date)
            })
            .collect();

        Self {
            title: self.title.clone(),
            unit: self.unit.clone(),
            elements: self.elements.clone(),
            periods,
        }
    }
}

/// Extracts only the digit characters from a raw value cell.
#[must_use]
pub fn extract_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A standardized statement as a numeric element-by-period matrix, expressed
/// in a single consistent unit.
///
/// `values` is row-major: `values[i][j]` is element `i` at period `j`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizedMatrix {
    /// Ordered row labels (line items).
    pub elements: Vec<String>,
    /// Ordered period column labels.
    pub periods: Vec<String>,
    /// Numeric grid, one row per element, one column per period.
    pub values: Vec<Vec<f64>>,
}

impl StandardizedMatrix {
    /// Looks up a single value by element and period label.
    ///
    /// With duplicate element labels the first occurrence wins.
    #[must_use]
    pub fn value(&self, element: &str, period: &str) -> Option<f64> {
        let row = self.elements.iter().position(|e| e == element)?;
        let col = self.periods.iter().position(|p| p == period)?;
        self.values.get(row)?.get(col).copied()
    }

    /// Converts the matrix into a polars `DataFrame` with an `element`
    /// column followed by one column per period.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.periods.len() + 1);
        columns.push(Column::new("element".into(), &self.elements));

        for (j, period) in self.periods.iter().enumerate() {
            let col: Vec<f64> = self
                .values
                .iter()
                .map(|row| row.get(j).copied().unwrap_or(f64::NAN))
                .collect();
            columns.push(Column::new(period.as_str().into(), col));
        }

        DataFrame::new(columns).map_err(|e| StatementError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_kind_names() {
        assert_eq!(StatementKind::IncomeStatement.as_str(), "income_statement");
        assert_eq!(StatementKind::BalanceSheet.as_str(), "balance_sheet");
        assert_eq!(StatementKind::CashFlow.as_str(), "cash_flow");
        assert_eq!(StatementKind::CashFlow.to_string(), "cash_flow");
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits("$ 274,515"), "274515");
        assert_eq!(extract_digits("(1,234)"), "1234");
        assert_eq!(extract_digits("3.28 [1]"), "328");
        assert_eq!(extract_digits(""), "");
    }

    #[test]
    fn test_cleaned_leaves_elements_untouched() {
        let mut by_date = HashMap::new();
        by_date.insert(
            "2020-09-26".to_string(),
            vec!["$ 274,515".to_string(), "(1,234)".to_string()],
        );
        let mut periods = HashMap::new();
        periods.insert("12 Months Ended".to_string(), by_date);

        let stmt = CanonicalStatement {
            title: "CONSOLIDATED STATEMENTS OF OPERATIONS".to_string(),
            unit: "USD ($)".to_string(),
            elements: vec!["Net sales (1)".to_string(), "Cost of sales".to_string()],
            periods,
        };

        let cleaned = stmt.cleaned();
        assert_eq!(cleaned.elements, stmt.elements);
        assert_eq!(
            cleaned.values("12 Months Ended", "2020-09-26").unwrap(),
            &["274515".to_string(), "1234".to_string()]
        );
    }

    #[test]
    fn test_matrix_value_lookup() {
        let matrix = StandardizedMatrix {
            elements: vec!["Total Revenue".to_string(), "Net Income".to_string()],
            periods: vec!["12/31/2021".to_string(), "12/31/2020".to_string()],
            values: vec![vec![1.0e9, 9.0e8], vec![2.0e8, 1.5e8]],
        };

        assert_eq!(matrix.value("Net Income", "12/31/2020"), Some(1.5e8));
        assert_eq!(matrix.value("Missing", "12/31/2020"), None);
        assert_eq!(matrix.value("Net Income", "12/31/2019"), None);
    }

    #[test]
    fn test_matrix_to_dataframe() {
        let matrix = StandardizedMatrix {
            elements: vec!["Total Revenue".to_string()],
            periods: vec!["12/31/2021".to_string(), "12/31/2020".to_string()],
            values: vec![vec![1.0e9, 9.0e8]],
        };

        let df = matrix.to_dataframe().unwrap();
        assert_eq!(df.shape(), (1, 3));
        assert!(df.column("12/31/2021").is_ok());
    }
}
