//! The Rate Store seam.
//!
//! The store is an external collaborator: an append-only table of dated
//! rate observations owned by the surrounding accounting system. This
//! crate only reads from it, through the [`RateStore`] trait, so tests
//! and demos can substitute in-memory or failing implementations.

use crate::core::currency::CurrencyPair;
use crate::core::rate::RateRecord;
use chrono::NaiveDate;
use thiserror::Error;

pub mod memory;
pub mod seed;

pub use memory::InMemoryRateStore;

/// Errors from the underlying store infrastructure.
///
/// Kept separate from [`crate::core::currency::FxError::RateNotFound`]:
/// a store that cannot be reached has not told us the data is missing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rate store unavailable: {0}")]
    Unavailable(String),
    #[error("rate store query failed: {0}")]
    Query(String),
}

/// Filter for a rate lookup.
///
/// Matches records whose `(base, quote)` equals any of `pairs` and whose
/// date is on or before `on_or_before`. The effective date is a calendar
/// date by type, so two lookups on the same day are deterministic
/// regardless of wall-clock time.
#[derive(Debug, Clone)]
pub struct RateQuery {
    /// Ordered pairs to match. A record matches if its own (base, quote)
    /// equals any entry; the query does not consider inverses — callers
    /// that want both directions include both pairs.
    pub pairs: Vec<CurrencyPair>,
    /// Only records dated on or before this date are eligible.
    pub on_or_before: NaiveDate,
}

impl RateQuery {
    pub fn new(pairs: Vec<CurrencyPair>, on_or_before: NaiveDate) -> Self {
        Self { pairs, on_or_before }
    }

    /// Convenience constructor for a single-pair lookup.
    pub fn single(pair: CurrencyPair, on_or_before: NaiveDate) -> Self {
        Self::new(vec![pair], on_or_before)
    }
}

/// Read-only access to dated rate records.
pub trait RateStore {
    /// Return all records matching `query`, ordered by date descending.
    ///
    /// Ordering within a single date is implementation-defined but must be
    /// stable, so "first record for a pair" is well-defined for callers
    /// that want the most recent observation.
    fn query_rates(&self, query: &RateQuery) -> Result<Vec<RateRecord>, StoreError>;
}

impl<S: RateStore + ?Sized> RateStore for &S {
    fn query_rates(&self, query: &RateQuery) -> Result<Vec<RateRecord>, StoreError> {
        (**self).query_rates(query)
    }
}
