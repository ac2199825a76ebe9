//! Source traits for statement parsing.
//!
//! This module defines the per-jurisdiction capability seam:
//!
//! - [`StatementSource`] - As-reported and standardized parsing for one
//!   jurisdiction/source variant
//! - [`StandardizedPayload`] - The raw standardized content a source accepts
//!
//! Callers pick a concrete source explicitly; there is no runtime subclass
//! dispatch. Sources are pure transformations over already-fetched content,
//! so every method is synchronous and side-effect free.

use std::fmt::Debug;

use crate::error::Result;
use crate::types::{CanonicalStatement, StandardizedMatrix, StatementKind};

/// Raw standardized statement content, tagged by the shape it arrived in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandardizedPayload {
    /// A JSON matrix payload with a top-level currency field and per-row
    /// objects keyed by line-item name.
    Json(String),
    /// An HTML table whose trailing rows carry the period date headers.
    Html {
        /// The raw HTML document or fragment containing the table.
        content: String,
        /// Which statement the table renders; decides the header row count.
        kind: StatementKind,
    },
}

/// Capability set implemented per jurisdiction/source variant.
///
/// A source knows how to turn the documents its jurisdiction produces into
/// the canonical shapes. It never fetches anything itself; both methods
/// receive already-retrieved raw content.
pub trait StatementSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "US").
    fn name(&self) -> &str;

    /// Parses one as-reported statement table rendered as HTML.
    fn parse_as_reported(&self, html: &str) -> Result<CanonicalStatement>;

    /// Normalizes a standardized statement payload into a numeric matrix.
    fn parse_standardized(&self, payload: &StandardizedPayload) -> Result<StandardizedMatrix>;
}
