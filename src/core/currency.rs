use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::store::StoreError;

/// ISO 4217-style currency code.
///
/// Callers are expected to hand in normalized, uppercase 3-letter codes
/// (e.g. "USD", "CAD"). Comparison is exact and case-sensitive; the
/// resolver never re-normalizes, so `"usd"` and `"USD"` are distinct
/// codes as far as this crate is concerned.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let cad = CurrencyCode::new("CAD");
/// assert_ne!(usd, cad);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An ordered currency pair: `base` converted into `quote`.
///
/// Order matters: `USD/CAD` and `CAD/USD` are distinct pairs whose rates
/// are reciprocal. The pair is a proper value type used directly as a map
/// key, so there is no string-encoded `"USD_CAD"` key to collide or typo.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::{CurrencyCode, CurrencyPair};
///
/// let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("CAD"));
/// assert_eq!(pair.inverse().base, CurrencyCode::new("CAD"));
/// assert_ne!(pair, pair.inverse());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// The reciprocal direction: `USD/CAD` becomes `CAD/USD`.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// True when base and quote are the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Errors arising from FX rate resolution and conversion.
#[derive(Debug, Error)]
pub enum FxError {
    /// No direct rate, inverse rate, or fallback entry exists for the pair
    /// as of the effective date. A hard, user-visible failure: callers must
    /// surface it rather than substitute a guessed rate, because silently
    /// treating an unresolvable pair as 1:1 corrupts financial figures.
    #[error("no FX rate available for {base}/{quote} as of {date}")]
    RateNotFound {
        base: CurrencyCode,
        quote: CurrencyCode,
        date: NaiveDate,
    },

    /// A rate that is zero, negative, or non-finite.
    #[error("FX rate must be positive and finite, got {rate} for {base}/{quote}")]
    InvalidRate {
        base: CurrencyCode,
        quote: CurrencyCode,
        rate: f64,
    },

    /// The underlying rate store failed. Deliberately distinct from
    /// [`FxError::RateNotFound`]: an unreachable store is not the same
    /// thing as missing data and must not be reported as such.
    #[error(transparent)]
    Store(#[from] StoreError),
}
