#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for financial statement normalization.
//!
//! This crate provides the foundational abstractions shared by the statement
//! parser crates:
//!
//! - [`StatementSource`](source::StatementSource) - Per-jurisdiction parsing capability
//! - [`CanonicalStatement`](types::CanonicalStatement) - A parsed as-reported statement
//! - [`StandardizedMatrix`](types::StandardizedMatrix) - A numeric element-by-period matrix
//! - [`FilingListCache`](cache::FilingListCache) - Explicit filings-list caching
//! - [`StatementError`](error::StatementError) - The fault taxonomy

/// Filings-list cache with explicit, caller-controlled lifetime.
pub mod cache;
/// Error types for statement normalization.
pub mod error;
/// Reporting period definitions and period-header date parsing.
pub mod period;
/// Source traits for statement parsing.
pub mod source;
/// Core data types (statement kinds, tables, matrices).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::FilingListCache;
pub use error::{Result, StatementError};
pub use period::{PeriodType, parse_period_date};
pub use source::{StandardizedPayload, StatementSource};
pub use types::{
    CanonicalStatement, FilingRecord, RawStatementTable, StandardizedMatrix, StatementKind,
    StatementLinkMap, extract_digits,
};
