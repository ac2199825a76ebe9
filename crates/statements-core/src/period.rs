//! Reporting period definitions and period-header date parsing.
//!
//! This module defines [`PeriodType`] for annual/quarterly reporting periods
//! and [`parse_period_date`] for deciding whether a rendered table header is
//! a point-in-time date or a duration label.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl PeriodType {
    /// Returns the SEC form type filed for this period.
    #[must_use]
    pub const fn form_type(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }
}

/// Date formats observed in rendered statement table headers.
///
/// The EDGAR viewer renders period columns like "Sep. 26, 2020"; standardized
/// providers use ISO or US slash formats.
const HEADER_DATE_FORMATS: &[&str] = &[
    "%b. %d, %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

/// Attempts to parse a table header as a calendar date.
///
/// Returns `None` for duration labels such as "12 Months Ended", which is how
/// header sequences are partitioned into duration labels and date columns.
#[must_use]
pub fn parse_period_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    HEADER_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
