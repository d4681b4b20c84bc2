use crate::core::currency::{CurrencyCode, CurrencyPair, FxError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated exchange-rate observation.
///
/// Semantics: on `date`, 1 unit of `base` equals `rate` units of `quote`.
/// Multiple records may exist for the same pair with different dates; the
/// resolver selects the most recent record dated on or before the effective
/// date. Records are immutable once created — rate ingestion appends new
/// records rather than updating old ones.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::CurrencyCode;
/// use fx_engine::core::rate::RateRecord;
/// use chrono::NaiveDate;
///
/// let record = RateRecord::new(
///     CurrencyCode::new("USD"),
///     CurrencyCode::new("CAD"),
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     1.35,
/// ).unwrap();
///
/// assert_eq!(record.rate(), 1.35);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecord {
    /// Unique identifier for this record.
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    /// The currency being converted from.
    base: CurrencyCode,
    /// The currency being converted to.
    quote: CurrencyCode,
    /// The calendar date the rate was observed on.
    date: NaiveDate,
    /// 1 unit of `base` equals this many units of `quote`. Strictly positive.
    rate: f64,
}

impl RateRecord {
    /// Create a new rate record.
    ///
    /// Returns [`FxError::InvalidRate`] if `rate` is zero, negative, or
    /// non-finite.
    pub fn new(
        base: CurrencyCode,
        quote: CurrencyCode,
        date: NaiveDate,
        rate: f64,
    ) -> Result<Self, FxError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(FxError::InvalidRate { base, quote, rate });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            base,
            quote,
            date,
            rate,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn quote(&self) -> &CurrencyCode {
        &self.quote
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The ordered pair this record quotes.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base.clone(), self.quote.clone())
    }
}
