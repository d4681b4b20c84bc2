//! Static fallback rates.
//!
//! A last-resort safety net for development and degraded environments
//! where the rate store is missing data that should exist. The table is
//! an explicit value injected into the resolver at construction, so tests
//! can override it and production can disable it with [`FallbackRates::empty`].

use crate::core::currency::{CurrencyCode, CurrencyPair, FxError};
use std::collections::HashMap;

/// Built-in well-known pairs, used when no explicit table is supplied.
const BUILTIN: &[(&str, &str, f64)] = &[
    ("USD", "CAD", 1.35),
    ("CAD", "USD", 0.74),
    ("EUR", "CAD", 1.47),
    ("CAD", "EUR", 0.68),
    ("USD", "EUR", 0.92),
    ("EUR", "USD", 1.08),
];

/// An injectable table of hard-coded fallback rates.
///
/// Hitting this table is not an error, but the resolver logs a warning
/// on every use: in a healthy deployment the store should have the data.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::{CurrencyCode, CurrencyPair};
/// use fx_engine::resolver::fallback::FallbackRates;
///
/// let rates = FallbackRates::builtin();
/// let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("CAD"));
/// assert_eq!(rates.get(&pair), Some(1.35));
///
/// let disabled = FallbackRates::empty();
/// assert_eq!(disabled.get(&pair), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FallbackRates {
    rates: HashMap<CurrencyPair, f64>,
}

impl FallbackRates {
    /// The built-in table of well-known pairs.
    pub fn builtin() -> Self {
        let rates = BUILTIN
            .iter()
            .map(|&(base, quote, rate)| {
                (
                    CurrencyPair::new(CurrencyCode::new(base), CurrencyCode::new(quote)),
                    rate,
                )
            })
            .collect();
        Self { rates }
    }

    /// An empty table. Disables the fallback step entirely.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    ///
    /// Returns [`FxError::InvalidRate`] if `rate` is zero, negative, or
    /// non-finite.
    pub fn insert(&mut self, pair: CurrencyPair, rate: f64) -> Result<(), FxError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(FxError::InvalidRate {
                base: pair.base,
                quote: pair.quote,
                rate,
            });
        }
        self.rates.insert(pair, rate);
        Ok(())
    }

    pub fn get(&self, pair: &CurrencyPair) -> Option<f64> {
        self.rates.get(pair).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
