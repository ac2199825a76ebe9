#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for financial statement normalization.
//!
//! This crate re-exports the core types and parser crates, and provides
//! [`UsSource`], the US-market implementation of
//! [`StatementSource`](statements_core::StatementSource): as-reported
//! statements come from the SEC EDGAR interactive viewer, standardized
//! statements from finviz (JSON) or investing.com (HTML) payloads.
//!
//! The pipeline is pure: every function here transforms already-fetched
//! content. Fetching, retries, and identifier resolution belong to the
//! caller.
//!
//! # Example
//!
//! ```no_run
//! use statements::{StandardizedPayload, StatementSource, UsSource};
//!
//! fn main() -> statements::Result<()> {
//!     let source = UsSource;
//!
//!     let table_html = std::fs::read_to_string("R4.htm").expect("fixture");
//!     let as_reported = source.parse_as_reported(&table_html)?;
//!     println!("{}: {} elements", as_reported.title, as_reported.elements.len());
//!
//!     let payload = std::fs::read_to_string("income.json").expect("fixture");
//!     let standardized = source.parse_standardized(&StandardizedPayload::Json(payload))?;
//!     println!("{} periods", standardized.periods.len());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use statements_core::*;

/// SEC EDGAR filing selection and as-reported table parsing.
pub use statements_edgar as edgar;
/// Finviz standardized JSON normalization.
pub use statements_finviz as finviz;
/// Investing.com standardized HTML normalization.
pub use statements_investing as investing;

use tracing::debug;

/// US-market statement source.
///
/// As-reported tables are parsed with the EDGAR viewer conventions;
/// standardized payloads are dispatched on their shape: JSON to the finviz
/// normalizer, HTML to the investing.com normalizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsSource;

impl StatementSource for UsSource {
    fn name(&self) -> &str {
        "US"
    }

    fn parse_as_reported(&self, html: &str) -> Result<CanonicalStatement> {
        statements_edgar::parse_as_reported(html)
    }

    fn parse_standardized(&self, payload: &StandardizedPayload) -> Result<StandardizedMatrix> {
        match payload {
            StandardizedPayload::Json(content) => {
                debug!("normalizing standardized JSON payload");
                statements_finviz::normalize_statement(content)
            }
            StandardizedPayload::Html { content, kind } => {
                debug!("normalizing standardized HTML payload for {}", kind);
                statements_investing::normalize_statement(content, *kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_HTML: &str = r#"
        <table>
            <tr><th class="tl">CONSOLIDATED BALANCE SHEETS - USD ($)</th></tr>
            <tr><th class="th">Sep. 26, 2020</th><th class="th">Sep. 28, 2019</th></tr>
            <tr><td class="pl">Total assets</td><td class="nump">323,888</td><td class="nump">338,516</td></tr>
        </table>
    "#;

    #[test]
    fn test_us_source_as_reported() {
        let stmt = UsSource.parse_as_reported(TABLE_HTML).unwrap();
        assert_eq!(stmt.title, "CONSOLIDATED BALANCE SHEETS");
        assert_eq!(stmt.elements, vec!["Total assets".to_string()]);
        // Balance sheets carry only point-in-time dates; the duration
        // defaults when every header parses as a date.
        assert!(stmt.periods.contains_key("12 Months Ended"));
    }

    #[test]
    fn test_us_source_standardized_json() {
        let payload = StandardizedPayload::Json(
            r#"{"currency": "USD", "data": {
                "Period End Date": {"0": "12/31/2021"},
                "Total Revenue": {"0": "1,000"}
            }}"#
            .to_string(),
        );
        let matrix = UsSource.parse_standardized(&payload).unwrap();
        assert_eq!(matrix.value("Total Revenue", "12/31/2021"), Some(1.0e9));
    }

    #[test]
    fn test_us_source_standardized_html() {
        let payload = StandardizedPayload::Html {
            content: r#"
                <table>
                    <tr><td>Total Revenue</td><td>1,000</td></tr>
                    <tr><td>Period Ending:</td><td>Dec 31, 2021</td></tr>
                </table>
            "#
            .to_string(),
            kind: StatementKind::IncomeStatement,
        };
        let matrix = UsSource.parse_standardized(&payload).unwrap();
        assert_eq!(matrix.value("Total Revenue", "2021-12-31"), Some(1.0e9));
    }

    #[test]
    fn test_us_source_is_a_statement_source_object() {
        let source: &dyn StatementSource = &UsSource;
        assert_eq!(source.name(), "US");
    }
}
