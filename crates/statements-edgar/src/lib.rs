#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR as-reported statement parsing.
//!
//! This crate covers the EDGAR side of the pipeline:
//!
//! - Deserializing a company's submissions list into [`FilingRecord`]s
//! - Selecting the most recent filing of a form type
//! - Classifying a filing's exhibit index into statement links
//! - Parsing one rendered statement table into a [`CanonicalStatement`]
//!
//! # Example
//!
//! ```no_run
//! use statements_core::PeriodType;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let submissions_json = std::fs::read_to_string("submissions.json")?;
//!     let filings = statements_edgar::parse_submissions(&submissions_json)?;
//!     let filing = statements_edgar::latest_filing(&filings, PeriodType::Annual)?;
//!
//!     let exhibits = vec![
//!         ("Consolidated Statements of Operations".to_string(), "R4".to_string()),
//!     ];
//!     let links = statements_edgar::classify_statement_links(
//!         &exhibits,
//!         "0000320193",
//!         &filing.accession_number,
//!     );
//!
//!     let table_html = std::fs::read_to_string("R4.htm")?;
//!     let statement = statements_edgar::parse_as_reported(&table_html)?;
//!     println!("{} ({})", statement.title, statement.unit);
//!     Ok(())
//! }
//! ```

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use chrono::NaiveDate;
use statements_core::{
    CanonicalStatement, FilingRecord, PeriodType, RawStatementTable, Result, StatementError,
    StatementKind, StatementLinkMap, parse_period_date,
};

/// Base URL for filed documents in the EDGAR archive.
const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// Base URL of the EDGAR interactive filing viewer.
const VIEWER_BASE_URL: &str = "https://www.sec.gov/cgi-bin/viewer";

/// Duration label assumed when every header parses as a date.
const DEFAULT_DURATION_LABEL: &str = "12 Months Ended";

/// Exhibit labels containing any of these are near-duplicate statements and
/// must never be classified as one of the three primary statements.
const EXCLUDED_LABEL_TERMS: &[&str] = &["parenthetical", "comprehensive", "stockholders"];

// =============================================================================
// Submissions list and filing selection
// =============================================================================

/// Deserializes an EDGAR submissions payload into filing records.
///
/// The submissions endpoint returns recent filings as parallel columnar
/// arrays; records are zipped back together with dashes stripped from
/// accession numbers.
pub fn parse_submissions(json: &str) -> Result<Vec<FilingRecord>> {
    let response: SubmissionsResponse =
        serde_json::from_str(json).map_err(|e| StatementError::Parse(e.to_string()))?;
    let recent = response.filings.recent;

    let len = recent.accession_number.len();
    if recent.form.len() != len
        || recent.primary_document.len() != len
        || recent.filing_date.len() != len
    {
        return Err(StatementError::Parse(
            "submissions columns have mismatched lengths".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let filing_date = NaiveDate::parse_from_str(&recent.filing_date[i], "%Y-%m-%d")
            .map_err(|e| {
                StatementError::Parse(format!(
                    "bad filing date {:?}: {e}",
                    recent.filing_date[i]
                ))
            })?;
        records.push(FilingRecord {
            accession_number: recent.accession_number[i].replace('-', ""),
            form_type: recent.form[i].clone(),
            primary_document: recent.primary_document[i].clone(),
            filing_date,
        });
    }

    debug!("parsed {} filings from submissions payload", records.len());
    Ok(records)
}

/// Selects the most recent filing of the form type filed for `period`.
///
/// Returns [`StatementError::EmptyResult`] when the company has no filing of
/// that form type, so callers can tell "nothing to parse" from a parse
/// failure.
pub fn latest_filing(filings: &[FilingRecord], period: PeriodType) -> Result<&FilingRecord> {
    let form_type = period.form_type();
    filings
        .iter()
        .filter(|f| f.form_type == form_type)
        .max_by_key(|f| f.filing_date)
        .ok_or_else(|| {
            StatementError::EmptyResult(format!("no {form_type} filing in submissions list"))
        })
}

/// Builds the interactive viewer URL for a filing.
#[must_use]
pub fn viewer_url(cik: &str, accession: &str) -> String {
    format!("{VIEWER_BASE_URL}?action=view&cik={cik}&accession_number={accession}&xbrl_type=v")
}

// =============================================================================
// Statement link classification
// =============================================================================

/// Classifies a filing's exhibit index into statement links.
///
/// `exhibits` holds `(display_label, short_filename)` pairs scraped from the
/// viewer's Financial Statements menu. Labels for parenthetical,
/// comprehensive-income, and stockholders-equity exhibits are skipped;
/// remaining labels are matched case-insensitively to one of the three
/// primary statements. When several exhibits match the same statement the
/// later one wins. Unmatched labels are dropped silently; a missing category
/// is signaled downstream when the caller asks for the absent key.
#[must_use]
pub fn classify_statement_links(
    exhibits: &[(String, String)],
    cik: &str,
    accession: &str,
) -> StatementLinkMap {
    let mut links = StatementLinkMap::new();

    for (label, filename) in exhibits {
        if let Some(kind) = classify_label(label) {
            links.insert(
                kind,
                format!("{ARCHIVES_BASE_URL}/{cik}/{accession}/{filename}.htm"),
            );
        }
    }

    debug!(
        "classified {} of {} exhibit links",
        links.len(),
        exhibits.len()
    );
    links
}

/// Matches one exhibit label to a statement kind, if any.
fn classify_label(label: &str) -> Option<StatementKind> {
    let lower = label.to_lowercase();

    if EXCLUDED_LABEL_TERMS.iter().any(|term| lower.contains(term)) {
        return None;
    }

    if ["income", "operations", "earnings"]
        .iter()
        .any(|term| lower.contains(term))
    {
        Some(StatementKind::IncomeStatement)
    } else if lower.contains("balance sheet") || lower.contains("financial position") {
        Some(StatementKind::BalanceSheet)
    } else if lower.contains("cash flow") {
        Some(StatementKind::CashFlow)
    } else {
        None
    }
}

// =============================================================================
// As-reported table parsing
// =============================================================================

/// Parses one rendered statement table straight from its HTML document.
///
/// Convenience over [`extract_raw_table`] followed by [`parse_statement`].
pub fn parse_as_reported(html: &str) -> Result<CanonicalStatement> {
    let table = extract_raw_table(html)?;
    parse_statement(&table)
}

/// Extracts the role-tagged cells of the first table in an EDGAR "R" document.
///
/// The viewer tags cells with fixed class names: `th` for period headers,
/// `tl` for the title, `pl` for element labels, and `nump`/`num`/`text` for
/// values. Parsing is tied to this exact convention; if the renderer changes
/// the class names this breaks by design.
pub fn extract_raw_table(html: &str) -> Result<RawStatementTable> {
    let header_sel = Selector::parse(".th").expect("static selector");
    let title_sel = Selector::parse(".tl").expect("static selector");
    let label_sel = Selector::parse(".pl").expect("static selector");
    let value_sel = Selector::parse(".nump, .num, .text").expect("static selector");
    let table_sel = Selector::parse("table").expect("static selector");

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| StatementError::Parse("no <table> in statement document".to_string()))?;

    let title = table
        .select(&title_sel)
        .next()
        .map(cell_text)
        .ok_or_else(|| StatementError::Parse("no title (tl) cell in statement table".to_string()))?;

    Ok(RawStatementTable {
        headers: table.select(&header_sel).map(cell_text).collect(),
        title,
        labels: table.select(&label_sel).map(cell_text).collect(),
        values: table.select(&value_sel).map(cell_text).collect(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Partitions period headers into duration labels and date columns.
///
/// The split point is the latest header index that fails to parse as a date:
/// duration labels are a strict prefix of the sequence, tolerant of
/// unparseable noise among them, and the remaining suffix must parse
/// entirely as dates. When every header parses, the whole sequence is dates
/// under a single implied "12 Months Ended" duration.
#[must_use]
pub fn split_headers(headers: &[String]) -> (Vec<String>, Vec<String>) {
    let mut split = 0;
    for (i, header) in headers.iter().enumerate() {
        if parse_period_date(header).is_none() {
            split = i + 1;
        }
    }

    if split == 0 {
        (vec![DEFAULT_DURATION_LABEL.to_string()], headers.to_vec())
    } else {
        (headers[..split].to_vec(), headers[split..].to_vec())
    }
}

/// Parses a raw statement table into a [`CanonicalStatement`].
///
/// Values arrive date-major: the cell at flat index `x` belongs to date
/// column `x % date_count`. The de-interleave is an explicit reshape with
/// element-count checks, failing with
/// [`StatementError::StructuralMismatch`] whenever the label count does not
/// reconcile with the value-to-period ratio. No partial statement is ever
/// returned.
pub fn parse_statement(table: &RawStatementTable) -> Result<CanonicalStatement> {
    let (title, unit) = table
        .title
        .split_once(" - ")
        .ok_or_else(|| StatementError::TitleFormat(table.title.clone()))?;

    if table.headers.is_empty() || table.labels.is_empty() || table.values.is_empty() {
        return Err(StatementError::EmptyResult(
            "statement table has no headers, labels, or values".to_string(),
        ));
    }

    let (durations, dates) = split_headers(&table.headers);
    if dates.is_empty() {
        return Err(StatementError::EmptyResult(
            "no date columns among period headers".to_string(),
        ));
    }

    let values_per_date = table.values.len() / dates.len();
    if table.values.len() % dates.len() != 0 || table.labels.len() != values_per_date {
        return Err(StatementError::StructuralMismatch {
            elements: table.labels.len(),
            values_per_period: values_per_date,
        });
    }

    let periods_per_duration = dates.len() / durations.len();
    let mut periods: HashMap<String, HashMap<String, Vec<String>>> = HashMap::new();

    for (i, duration) in durations.iter().enumerate() {
        let by_date = periods.entry(duration.clone()).or_default();
        for x in i * periods_per_duration..(i + 1) * periods_per_duration {
            let column = date_column(&table.values, x, dates.len());
            if column.len() != table.labels.len() {
                return Err(StatementError::StructuralMismatch {
                    elements: table.labels.len(),
                    values_per_period: column.len(),
                });
            }
            by_date.insert(dates[x].clone(), column);
        }
    }

    debug!(
        "parsed statement {:?}: {} elements, {} durations, {} dates",
        title,
        table.labels.len(),
        durations.len(),
        dates.len()
    );

    Ok(CanonicalStatement {
        title: title.to_string(),
        unit: unit.to_string(),
        elements: table.labels.clone(),
        periods,
    })
}

/// Collects the per-element values of one date column from the date-major
/// flat value sequence.
fn date_column(values: &[String], start: usize, stride: usize) -> Vec<String> {
    values.iter().skip(start).step_by(stride).cloned().collect()
}

// =============================================================================
// EDGAR submissions response types
// =============================================================================

/// Response from the EDGAR submissions endpoint.
#[derive(Debug, Deserialize)]
struct SubmissionsResponse {
    filings: FilingsSection,
}

#[derive(Debug, Deserialize)]
struct FilingsSection {
    recent: RecentFilings,
}

/// Recent filings as parallel columnar arrays.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    accession_number: Vec<String>,
    form: Vec<String>,
    primary_document: Vec<String>,
    filing_date: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
