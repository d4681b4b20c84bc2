//! In-memory [`RateStore`] implementation.
//!
//! Backs the CLI, demos, and tests. Tracks how many queries have been
//! issued so tests can assert the batch resolver's single-query property.

use crate::core::rate::RateRecord;
use crate::store::{RateQuery, RateStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A rate store holding records in memory.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::{CurrencyCode, CurrencyPair};
/// use fx_engine::core::rate::RateRecord;
/// use fx_engine::store::{InMemoryRateStore, RateQuery, RateStore};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let store = InMemoryRateStore::with_records(vec![
///     RateRecord::new(CurrencyCode::new("USD"), CurrencyCode::new("CAD"), date, 1.35).unwrap(),
/// ]);
///
/// let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("CAD"));
/// let records = store.query_rates(&RateQuery::single(pair, date)).unwrap();
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    records: Vec<RateRecord>,
    queries: AtomicUsize,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RateRecord>) -> Self {
        Self {
            records,
            queries: AtomicUsize::new(0),
        }
    }

    /// Append a record. Records are never updated or removed.
    pub fn insert(&mut self, record: RateRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of queries issued against this store since creation.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl RateStore for InMemoryRateStore {
    fn query_rates(&self, query: &RateQuery) -> Result<Vec<RateRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::Relaxed);

        let mut matches: Vec<RateRecord> = self
            .records
            .iter()
            .filter(|r| r.date() <= query.on_or_before)
            .filter(|r| query.pairs.iter().any(|p| r.base() == &p.base && r.quote() == &p.quote))
            .cloned()
            .collect();

        // Stable sort keeps insertion order within a date.
        matches.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(matches)
    }
}
