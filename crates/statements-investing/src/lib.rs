#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Investing.com standardized statement normalization.
//!
//! These tables carry the line-item label in the first column and the period
//! date headers in the trailing rows: two for cash-flow statements (a date
//! row followed by a period-length row, in that order), one otherwise. Date
//! strings arrive with stray punctuation, and a lone `-` cell is the
//! placeholder for "not reported this period".
//!
//! Rows that cannot be coerced to numbers are section headers and other
//! non-data rows; they are dropped rather than failing the whole table. This
//! is the one place in the pipeline where bad cells are recovered locally.

use chrono::NaiveDate;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use statements_core::{Result, StandardizedMatrix, StatementError, StatementKind};

/// Source values are stated in millions; rescale to base currency units.
const VALUES_UNIT: f64 = 1_000_000.0;

/// Rows whose label contains one of these are per-share rows and must not be
/// scaled as currency.
const PER_SHARE_TERMS: &[&str] = &["eps", "dps"];

/// Punctuation-free date formats tried after header cleanup.
const HEADER_DATE_FORMATS: &[&str] = &["%b %d %Y", "%B %d %Y", "%Y %m %d", "%m %d %Y"];

/// Normalizes a standardized statement HTML table into a numeric matrix.
///
/// The trailing header rows (two for cash flow, one otherwise) supply the
/// period columns; remaining rows are line items. Lone `-` cells become 0,
/// non-coercible rows are dropped with a warning, and values are rescaled to
/// base currency units with a compensating divide for per-share rows.
pub fn normalize_statement(html: &str, kind: StatementKind) -> Result<StandardizedMatrix> {
    let mut rows = table_rows(html)?;

    let header_rows = match kind {
        StatementKind::CashFlow => 2,
        _ => 1,
    };
    if rows.len() <= header_rows {
        return Err(StatementError::EmptyResult(
            "standardized table has no data rows".to_string(),
        ));
    }

    // The date row leads the trailing header block; for cash flow a
    // period-length row follows it.
    let header_block = rows.split_off(rows.len() - header_rows);
    let date_row = &header_block[0];

    let periods = date_row
        .iter()
        .skip(1)
        .map(|raw| parse_header_date(raw).map(|d| d.format("%Y-%m-%d").to_string()))
        .collect::<Result<Vec<String>>>()?;
    if periods.is_empty() {
        return Err(StatementError::EmptyResult(
            "standardized table has no period columns".to_string(),
        ));
    }

    let mut elements = Vec::new();
    let mut values = Vec::new();

    for row in &rows {
        let Some((label, cells)) = row.split_first() else {
            continue;
        };
        if cells.len() != periods.len() {
            warn!("dropping row {:?}: {} cells for {} periods", label, cells.len(), periods.len());
            continue;
        }

        let Some(mut row_values) = cells
            .iter()
            .map(|cell| coerce_cell(cell).map(|n| n * VALUES_UNIT))
            .collect::<Option<Vec<f64>>>()
        else {
            warn!("dropping non-numeric row {:?}", label);
            continue;
        };

        // Compensating divide: per-share rows are not currency.
        if is_per_share(label) {
            for value in &mut row_values {
                *value /= VALUES_UNIT;
            }
        }

        elements.push(label.clone());
        values.push(row_values);
    }

    if elements.is_empty() {
        return Err(StatementError::EmptyResult(
            "no coercible data rows in standardized table".to_string(),
        ));
    }

    debug!(
        "normalized {} statement table: {} elements x {} periods",
        kind,
        elements.len(),
        periods.len()
    );

    Ok(StandardizedMatrix {
        elements,
        periods,
        values,
    })
}

/// Collects the rows of the first table as trimmed cell text.
fn table_rows(html: &str) -> Result<Vec<Vec<String>>> {
    let table_sel = Selector::parse("table").expect("static selector");
    let row_sel = Selector::parse("tr").expect("static selector");
    let cell_sel = Selector::parse("td, th").expect("static selector");

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| StatementError::Parse("no <table> in standardized document".to_string()))?;

    Ok(table
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect())
}

/// Parses a date header after stripping stray punctuation.
fn parse_header_date(raw: &str) -> Result<NaiveDate> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    HEADER_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .ok_or_else(|| StatementError::Parse(format!("unparseable period header {raw:?}")))
}

/// Coerces one cell to a number; a lone `-` is the zero placeholder.
fn coerce_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "-" {
        return Some(0.0);
    }
    trimmed.replace(',', "").parse::<f64>().ok()
}

fn is_per_share(label: &str) -> bool {
    let lower = label.to_lowercase();
    PER_SHARE_TERMS.iter().any(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCOME_TABLE: &str = r#"
        <table>
            <tr><td>Total Revenue</td><td>1,000</td><td>900</td></tr>
            <tr><td>EPS Diluted</td><td>1.5</td><td>1.2</td></tr>
            <tr><td>Operating Items</td><td></td><td></td></tr>
            <tr><td>Period Ending:</td><td>Dec 31, 2021</td><td>Dec 31, 2020*</td></tr>
        </table>
    "#;

    const CASH_FLOW_TABLE: &str = r#"
        <table>
            <tr><td>Cash From Operating Activities</td><td>2,500</td><td>2,000</td></tr>
            <tr><td>DPS - Common Stock Primary Issue</td><td>0.75</td><td>0.5</td></tr>
            <tr><td>Net Change in Cash</td><td>-</td><td>120</td></tr>
            <tr><td>Period Ending:</td><td>Dec 31, 2021</td><td>Dec 31, 2020</td></tr>
            <tr><td>Period Length:</td><td>12 Months</td><td>12 Months</td></tr>
        </table>
    "#;

    #[test]
    fn test_periods_from_trailing_header_row() {
        let matrix = normalize_statement(INCOME_TABLE, StatementKind::IncomeStatement).unwrap();
        assert_eq!(
            matrix.periods,
            vec!["2021-12-31".to_string(), "2020-12-31".to_string()]
        );
    }

    #[test]
    fn test_currency_rows_rescaled() {
        let matrix = normalize_statement(INCOME_TABLE, StatementKind::IncomeStatement).unwrap();
        assert_eq!(matrix.value("Total Revenue", "2021-12-31"), Some(1.0e9));
        assert_eq!(matrix.value("Total Revenue", "2020-12-31"), Some(9.0e8));
    }

    #[test]
    fn test_eps_row_stays_per_share() {
        let matrix = normalize_statement(INCOME_TABLE, StatementKind::IncomeStatement).unwrap();
        assert_eq!(matrix.value("EPS Diluted", "2021-12-31"), Some(1.5));
    }

    #[test]
    fn test_non_numeric_rows_dropped_not_fatal() {
        let matrix = normalize_statement(INCOME_TABLE, StatementKind::IncomeStatement).unwrap();
        assert!(!matrix.elements.contains(&"Operating Items".to_string()));
        assert_eq!(matrix.elements.len(), 2);
    }

    #[test]
    fn test_cash_flow_two_header_rows() {
        let matrix = normalize_statement(CASH_FLOW_TABLE, StatementKind::CashFlow).unwrap();
        assert_eq!(
            matrix.periods,
            vec!["2021-12-31".to_string(), "2020-12-31".to_string()]
        );
        assert_eq!(
            matrix.value("Cash From Operating Activities", "2021-12-31"),
            Some(2.5e9)
        );
    }

    #[test]
    fn test_dps_row_stays_per_share() {
        let matrix = normalize_statement(CASH_FLOW_TABLE, StatementKind::CashFlow).unwrap();
        assert_eq!(
            matrix.value("DPS - Common Stock Primary Issue", "2021-12-31"),
            Some(0.75)
        );
    }

    #[test]
    fn test_dash_placeholder_is_zero() {
        let matrix = normalize_statement(CASH_FLOW_TABLE, StatementKind::CashFlow).unwrap();
        assert_eq!(matrix.value("Net Change in Cash", "2021-12-31"), Some(0.0));
        assert_eq!(matrix.value("Net Change in Cash", "2020-12-31"), Some(1.2e8));
    }

    #[test]
    fn test_no_table_is_parse_error() {
        assert!(matches!(
            normalize_statement("<p>no table</p>", StatementKind::IncomeStatement),
            Err(StatementError::Parse(_))
        ));
    }

    #[test]
    fn test_header_only_table_is_empty_result() {
        let html = "<table><tr><td>Period Ending:</td><td>Dec 31, 2021</td></tr></table>";
        assert!(matches!(
            normalize_statement(html, StatementKind::IncomeStatement),
            Err(StatementError::EmptyResult(_))
        ));
    }

    #[test]
    fn test_unparseable_date_header_is_parse_error() {
        let html = r#"
            <table>
                <tr><td>Total Revenue</td><td>1,000</td></tr>
                <tr><td>Period Ending:</td><td>forever</td></tr>
            </table>
        "#;
        assert!(matches!(
            normalize_statement(html, StatementKind::IncomeStatement),
            Err(StatementError::Parse(_))
        ));
    }
}
