//! # fx-engine
//!
//! Exchange-rate resolution and minor-unit conversion engine for
//! multi-currency accounting.
//!
//! Given a store of dated `(base, quote, date, rate)` observations, the
//! engine resolves the rate for a currency pair as of an effective date,
//! falling back through direct rate → inverse rate → static table, and
//! converts integer-cent amounts without letting floating point touch
//! the monetary values themselves.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: currency codes, pairs, rate records, errors
//! - **store** — The Rate Store trait plus in-memory and sample-data implementations
//! - **resolver** — Single-pair and single-query batch resolution, conversion,
//!   and the injectable fallback table

pub mod core;
pub mod resolver;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, CurrencyPair, FxError};
    pub use crate::core::rate::RateRecord;
    pub use crate::resolver::{FallbackRates, FxResolver};
    pub use crate::store::{InMemoryRateStore, RateQuery, RateStore, StoreError};
}
