#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Finviz standardized statement normalization.
//!
//! Finviz serves standardized statements as a JSON matrix: a top-level
//! currency field and a `data` object holding one object per line item, in
//! row order, where the first pseudo-row carries the period date labels.
//! [`normalize_statement`] turns that payload into a numeric
//! [`StandardizedMatrix`] in a single consistent unit.
//!
//! # Example
//!
//! ```
//! let payload = r#"{"currency": "USD", "data": {
//!     "Period End Date": {"0": "12/31/2021", "1": "12/31/2020"},
//!     "Total Revenue": {"0": "1,000", "1": "900"}
//! }}"#;
//!
//! let matrix = statements_finviz::normalize_statement(payload).unwrap();
//! assert_eq!(matrix.value("Total Revenue", "12/31/2021"), Some(1_000_000_000.0));
//! ```

use serde_json::Value;
use tracing::debug;

use statements_core::{PeriodType, Result, StandardizedMatrix, StatementError, StatementKind};

/// Finviz statement API endpoint.
const STATEMENT_BASE_URL: &str = "https://finviz.com/api/statement.ashx";

/// Source values are stated in millions; rescale to base currency units.
const VALUES_UNIT: f64 = 1_000_000.0;

/// Rows whose label contains one of these are per-share or headcount rows
/// and must not be scaled as currency.
const NON_CURRENCY_TERMS: &[&str] = &["eps", "employee", "number"];

/// Pseudo-row carrying period lengths rather than financial data.
const PERIOD_LENGTH_ROW: &str = "Period Length";

/// Builds the statement API URL for a ticker, statement, and period.
#[must_use]
pub fn statement_endpoint(ticker: &str, kind: StatementKind, period: PeriodType) -> String {
    let statement_code = match kind {
        StatementKind::IncomeStatement => 'I',
        StatementKind::BalanceSheet => 'B',
        StatementKind::CashFlow => 'C',
    };
    let period_code = match period {
        PeriodType::Annual => 'A',
        PeriodType::Quarterly => 'Q',
    };
    format!("{STATEMENT_BASE_URL}?t={ticker}&s={statement_code}{period_code}")
}

/// Normalizes a standardized statement JSON payload into a numeric matrix.
///
/// The currency field and any "Period Length" pseudo-row are dropped, the
/// first data row becomes the period column labels, values are stripped of
/// thousand separators and coerced to numbers, and everything is rescaled to
/// base currency units with a compensating divide for per-share and
/// headcount rows.
///
/// Fails with [`StatementError::NonNumericValue`] when a value cannot be
/// coerced after cleanup, and with [`StatementError::UpstreamStatus`] when
/// the payload embeds a non-success provider status.
pub fn normalize_statement(payload: &str) -> Result<StandardizedMatrix> {
    let root: Value =
        serde_json::from_str(payload).map_err(|e| StatementError::Parse(e.to_string()))?;
    let root = root
        .as_object()
        .ok_or_else(|| StatementError::Parse("standardized payload is not an object".to_string()))?;

    validate_status(root)?;

    // The currency field is dropped; all values are rescaled to base units.
    let data = root
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| StatementError::Parse("standardized payload has no data object".to_string()))?;

    let mut rows = data.iter().filter(|(label, _)| *label != PERIOD_LENGTH_ROW);

    let (_, date_row) = rows.next().ok_or_else(|| {
        StatementError::EmptyResult("standardized payload has no rows".to_string())
    })?;
    let periods = label_row(date_row)?;

    let mut elements = Vec::new();
    let mut values = Vec::new();

    for (label, row) in rows {
        let row = row.as_object().ok_or_else(|| {
            StatementError::Parse(format!("row {label:?} is not an object"))
        })?;
        if row.len() != periods.len() {
            return Err(StatementError::Parse(format!(
                "row {label:?} has {} values, expected {}",
                row.len(),
                periods.len()
            )));
        }

        let mut row_values = row
            .values()
            .map(|cell| coerce_number(cell).map(|n| n * VALUES_UNIT))
            .collect::<Result<Vec<f64>>>()?;

        // Compensating divide: per-share and headcount rows are not currency.
        if is_non_currency(label) {
            for value in &mut row_values {
                *value /= VALUES_UNIT;
            }
        }

        elements.push(label.clone());
        values.push(row_values);
    }

    if elements.is_empty() {
        return Err(StatementError::EmptyResult(
            "standardized payload has no data rows".to_string(),
        ));
    }

    debug!(
        "normalized standardized statement: {} elements x {} periods",
        elements.len(),
        periods.len()
    );

    Ok(StandardizedMatrix {
        elements,
        periods,
        values,
    })
}

/// Fails when the payload embeds an explicit non-success provider status.
///
/// Providers that wrap results report `status` (with "000" for success) and
/// a human-readable `message` inside an otherwise well-formed body. This is
/// distinct from transport failures, which never reach the normalizer.
fn validate_status(root: &serde_json::Map<String, Value>) -> Result<()> {
    let Some(status) = root.get("status") else {
        return Ok(());
    };
    let status = json_text(status);
    if status == "000" {
        return Ok(());
    }

    let message = root.get("message").map(json_text).unwrap_or_default();
    Err(StatementError::UpstreamStatus { status, message })
}

/// Reads the date pseudo-row as period column labels.
fn label_row(row: &Value) -> Result<Vec<String>> {
    let row = row.as_object().ok_or_else(|| {
        StatementError::Parse("date row of standardized payload is not an object".to_string())
    })?;
    Ok(row.values().map(json_text).collect())
}

/// Coerces one cell to a number, stripping thousand separators first.
fn coerce_number(cell: &Value) -> Result<f64> {
    match cell {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| StatementError::NonNumericValue(n.to_string())),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            cleaned
                .parse::<f64>()
                .map_err(|_| StatementError::NonNumericValue(s.clone()))
        }
        other => Err(StatementError::NonNumericValue(other.to_string())),
    }
}

fn is_non_currency(label: &str) -> bool {
    let lower = label.to_lowercase();
    NON_CURRENCY_TERMS.iter().any(|term| lower.contains(term))
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"currency": "USD", "data": {
        "Period End Date": {"0": "12/31/2021", "1": "12/31/2020"},
        "Period Length": {"0": "12 Months", "1": "12 Months"},
        "Total Revenue": {"0": "1,000", "1": "900"},
        "EPS (Diluted)": {"0": "1.5", "1": "1.2"},
        "Total Employees": {"0": "154,000", "1": "147,000"}
    }}"#;

    #[test]
    fn test_statement_endpoint() {
        assert_eq!(
            statement_endpoint("AAPL", StatementKind::IncomeStatement, PeriodType::Annual),
            "https://finviz.com/api/statement.ashx?t=AAPL&s=IA"
        );
        assert_eq!(
            statement_endpoint("AAPL", StatementKind::CashFlow, PeriodType::Quarterly),
            "https://finviz.com/api/statement.ashx?t=AAPL&s=CQ"
        );
    }

    #[test]
    fn test_normalize_shape() {
        let matrix = normalize_statement(PAYLOAD).unwrap();
        assert_eq!(
            matrix.periods,
            vec!["12/31/2021".to_string(), "12/31/2020".to_string()]
        );
        // Date and period-length pseudo-rows are not elements.
        assert_eq!(
            matrix.elements,
            vec![
                "Total Revenue".to_string(),
                "EPS (Diluted)".to_string(),
                "Total Employees".to_string()
            ]
        );
    }

    #[test]
    fn test_currency_rows_rescaled_to_base_units() {
        let matrix = normalize_statement(PAYLOAD).unwrap();
        assert_eq!(matrix.value("Total Revenue", "12/31/2021"), Some(1.0e9));
        assert_eq!(matrix.value("Total Revenue", "12/31/2020"), Some(9.0e8));
    }

    #[test]
    fn test_per_share_and_headcount_rows_not_rescaled() {
        let matrix = normalize_statement(PAYLOAD).unwrap();
        assert_eq!(matrix.value("EPS (Diluted)", "12/31/2021"), Some(1.5));
        assert_eq!(matrix.value("Total Employees", "12/31/2021"), Some(154_000.0));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let first = normalize_statement(PAYLOAD).unwrap();
        let second = normalize_statement(PAYLOAD).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_numeric_value_fault() {
        let payload = r#"{"currency": "USD", "data": {
            "Period End Date": {"0": "12/31/2021"},
            "Total Revenue": {"0": "n/a"}
        }}"#;
        assert!(matches!(
            normalize_statement(payload),
            Err(StatementError::NonNumericValue(v)) if v == "n/a"
        ));
    }

    #[test]
    fn test_upstream_status_fault() {
        let payload = r#"{"status": "013", "message": "no data found"}"#;
        assert!(matches!(
            normalize_statement(payload),
            Err(StatementError::UpstreamStatus { status, message })
                if status == "013" && message == "no data found"
        ));
    }

    #[test]
    fn test_success_status_passes_through() {
        let payload = r#"{"status": "000", "currency": "USD", "data": {
            "Period End Date": {"0": "12/31/2021"},
            "Total Revenue": {"0": 1000}
        }}"#;
        let matrix = normalize_statement(payload).unwrap();
        assert_eq!(matrix.value("Total Revenue", "12/31/2021"), Some(1.0e9));
    }

    #[test]
    fn test_missing_data_object() {
        assert!(matches!(
            normalize_statement(r#"{"currency": "USD"}"#),
            Err(StatementError::Parse(_))
        ));
    }

    #[test]
    fn test_only_pseudo_rows_is_empty_result() {
        let payload = r#"{"currency": "USD", "data": {
            "Period End Date": {"0": "12/31/2021"},
            "Period Length": {"0": "12 Months"}
        }}"#;
        assert!(matches!(
            normalize_statement(payload),
            Err(StatementError::EmptyResult(_))
        ));
    }
}
