//! Filings-list cache with explicit, caller-controlled lifetime.
//!
//! A company's filings list rarely changes within a session, but hiding the
//! memoization inside a lookup function makes staleness untestable. The
//! [`FilingListCache`] is an ordinary object the caller owns: entries live
//! until `refresh` is requested or the cache is cleared.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::types::FilingRecord;

/// In-memory cache of filings lists keyed by registrant id (CIK).
#[derive(Debug, Default)]
pub struct FilingListCache {
    entries: RwLock<HashMap<String, Vec<FilingRecord>>>,
}

impl FilingListCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached filings list for a registrant, if present.
    #[must_use]
    pub fn get(&self, cik: &str) -> Option<Vec<FilingRecord>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(cik).cloned())
    }

    /// Returns the cached list for `cik`, invoking `load` on a miss or when
    /// `refresh` is set.
    ///
    /// `load` typically deserializes a freshly fetched submissions payload.
    /// A failed load leaves any existing entry in place.
    pub fn get_or_insert_with<F>(
        &self,
        cik: &str,
        refresh: bool,
        load: F,
    ) -> Result<Vec<FilingRecord>>
    where
        F: FnOnce() -> Result<Vec<FilingRecord>>,
    {
        if !refresh
            && let Some(cached) = self.get(cik)
        {
            debug!("filings cache hit for CIK {}", cik);
            return Ok(cached);
        }

        let records = load()?;
        debug!(
            "caching {} filings for CIK {} (refresh: {})",
            records.len(),
            cik,
            refresh
        );
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(cik.to_string(), records.clone());
        }
        Ok(records)
    }

    /// Removes every cached entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Returns the number of registrants with a cached list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
