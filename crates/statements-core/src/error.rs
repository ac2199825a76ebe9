//! Error types for statement normalization.
//!
//! This module defines [`StatementError`] which covers all error cases that
//! can occur when classifying, parsing, or normalizing financial statement
//! tables.

use thiserror::Error;

/// Errors that can occur during statement normalization.
#[derive(Error, Debug)]
pub enum StatementError {
    /// Element count does not reconcile with the value-to-period ratio in an
    /// as-reported table. The statement cannot be safely reshaped.
    #[error("structural mismatch: {elements} element labels but {values_per_period} values per period")]
    StructuralMismatch {
        /// Number of element labels found in the table.
        elements: usize,
        /// Number of values per date period implied by the cell counts.
        values_per_period: usize,
    },

    /// A statement title cell lacks the expected `"<name> - <unit>"` separator.
    #[error("title cell {0:?} is missing the \" - \" name/unit separator")]
    TitleFormat(String),

    /// A standardized value could not be coerced to a number after cleanup.
    #[error("non-numeric value in standardized statement: {0:?}")]
    NonNumericValue(String),

    /// Upstream selection yielded nothing to operate on.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// An external data provider reported a non-success status inside an
    /// otherwise well-formed payload.
    #[error("upstream status {status}: {message}")]
    UpstreamStatus {
        /// The raw status code reported by the provider.
        status: String,
        /// The message accompanying the status code.
        message: String,
    },

    /// A payload was structurally malformed (bad JSON, missing table, etc.).
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias using [`StatementError`].
pub type Result<T> = std::result::Result<T, StatementError>;
