use crate::core::currency::{CurrencyCode, CurrencyPair, FxError};
use crate::resolver::fallback::FallbackRates;
use crate::store::{RateQuery, RateStore};
use chrono::{NaiveDate, Utc};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Exchange-rate resolver and minor-unit converter.
///
/// Stateless beyond its store handle and fallback table: every method
/// takes `&self`, performs no caching across calls, and writes nothing,
/// so concurrent use needs no synchronization.
///
/// # Resolution chain (single pair)
///
/// 1. Identity — same currency resolves to 1.0 with no store access.
/// 2. Direct — most recent stored record for `(base, quote)` dated on or
///    before the effective date.
/// 3. Inverse — most recent record for `(quote, base)`, used as its
///    reciprocal. Never written back; resolution is read-only.
/// 4. Fallback — the injected static table, with a logged warning.
/// 5. [`FxError::RateNotFound`].
///
/// # Single-pair vs batch failure policy
///
/// [`FxResolver::resolve_rate`] and [`FxResolver::convert`] fail hard on
/// an unresolvable pair. [`FxResolver::resolve_rates_batch`] instead
/// degrades that one pair to 1.0 with a logged warning and resolves the
/// rest, so one bad data point cannot abort a whole multi-currency
/// report. The asymmetry is deliberate; do not "fix" it into
/// consistency. The degraded 1.0 is a last-resort placeholder, not a
/// claim of rate parity.
///
/// # Examples
///
/// ```
/// use fx_engine::core::currency::CurrencyCode;
/// use fx_engine::core::rate::RateRecord;
/// use fx_engine::resolver::FxResolver;
/// use fx_engine::store::InMemoryRateStore;
/// use chrono::NaiveDate;
///
/// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let store = InMemoryRateStore::with_records(vec![
///     RateRecord::new(CurrencyCode::new("USD"), CurrencyCode::new("CAD"), jan, 1.35).unwrap(),
/// ]);
/// let resolver = FxResolver::new(store);
///
/// let jun = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let cents = resolver.convert(1000, &CurrencyCode::new("USD"), &CurrencyCode::new("CAD"), jun);
/// assert_eq!(cents.unwrap(), 1350);
/// ```
#[derive(Debug)]
pub struct FxResolver<S> {
    store: S,
    fallback: FallbackRates,
}

impl<S: RateStore> FxResolver<S> {
    /// Create a resolver with the built-in fallback table.
    pub fn new(store: S) -> Self {
        Self::with_fallback(store, FallbackRates::builtin())
    }

    /// Create a resolver with an explicit fallback table.
    ///
    /// Pass [`FallbackRates::empty`] to disable the fallback step.
    pub fn with_fallback(store: S, fallback: FallbackRates) -> Self {
        Self { store, fallback }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the rate for one pair as of `on`.
    ///
    /// 1 unit of `base` equals the returned number of units of `quote`.
    /// Fails with [`FxError::RateNotFound`] when the whole chain comes up
    /// empty; a store failure propagates as [`FxError::Store`] instead.
    pub fn resolve_rate(
        &self,
        base: &CurrencyCode,
        quote: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<f64, FxError> {
        if base == quote {
            return Ok(1.0);
        }

        let pair = CurrencyPair::new(base.clone(), quote.clone());

        let direct = self.store.query_rates(&RateQuery::single(pair.clone(), on))?;
        if let Some(record) = direct.first() {
            return Ok(record.rate());
        }

        let inverse = self
            .store
            .query_rates(&RateQuery::single(pair.inverse(), on))?;
        if let Some(record) = inverse.first() {
            return Ok(1.0 / record.rate());
        }

        if let Some(rate) = self.fallback.get(&pair) {
            warn!("using static fallback rate {} for {}", rate, pair);
            return Ok(rate);
        }

        Err(FxError::RateNotFound {
            base: base.clone(),
            quote: quote.clone(),
            date: on,
        })
    }

    /// Resolve rates for many pairs with at most one store query.
    ///
    /// Identity pairs resolve to 1.0 without touching the store. All
    /// remaining pairs are folded into a single query covering both the
    /// direct and inverse direction of each; issuing one query instead of
    /// one per pair is the entire point of this method.
    ///
    /// A pair that resolves through the fallback table, or not at all,
    /// never fails the batch: the unresolvable pair degrades to 1.0 and a
    /// warning is logged. Only a store failure propagates, as
    /// [`FxError::Store`].
    ///
    /// The result holds one entry per distinct requested pair.
    pub fn resolve_rates_batch(
        &self,
        pairs: &[CurrencyPair],
        on: NaiveDate,
    ) -> Result<HashMap<CurrencyPair, f64>, FxError> {
        let mut resolved: HashMap<CurrencyPair, f64> = HashMap::new();
        let mut distinct: Vec<CurrencyPair> = Vec::new();
        let mut seen: HashSet<CurrencyPair> = HashSet::new();

        for pair in pairs {
            if !seen.insert(pair.clone()) {
                continue;
            }
            if pair.is_identity() {
                resolved.insert(pair.clone(), 1.0);
            } else {
                distinct.push(pair.clone());
            }
        }

        if distinct.is_empty() {
            return Ok(resolved);
        }

        // Union of direct and inverse conditions, one round-trip.
        let mut query_pairs: Vec<CurrencyPair> = Vec::with_capacity(distinct.len() * 2);
        let mut query_seen: HashSet<CurrencyPair> = HashSet::new();
        for pair in &distinct {
            for candidate in [pair.clone(), pair.inverse()] {
                if query_seen.insert(candidate.clone()) {
                    query_pairs.push(candidate);
                }
            }
        }

        let records = self.store.query_rates(&RateQuery::new(query_pairs, on))?;

        // Records arrive most-recent-first; keep the first per pair.
        let mut latest: HashMap<CurrencyPair, f64> = HashMap::new();
        for record in &records {
            latest.entry(record.pair()).or_insert_with(|| record.rate());
        }

        for pair in distinct {
            let rate = if let Some(&rate) = latest.get(&pair) {
                rate
            } else if let Some(&rate) = latest.get(&pair.inverse()) {
                1.0 / rate
            } else if let Some(rate) = self.fallback.get(&pair) {
                warn!("using static fallback rate {} for {}", rate, pair);
                rate
            } else {
                warn!(
                    "no rate resolvable for {} as of {}, degrading to 1.0",
                    pair, on
                );
                1.0
            };
            resolved.insert(pair, rate);
        }

        Ok(resolved)
    }

    /// Convert an integer minor-unit amount between currencies as of `on`.
    ///
    /// Monetary amounts stay integers across this boundary: the amount is
    /// multiplied by the resolved rate in floating point and then rounded
    /// half-away-from-zero (`f64::round`), so `convert(-a) == -convert(a)`
    /// for refunds and credits. The rate itself is never rounded.
    ///
    /// Uses single-pair resolution, so an unresolvable pair is a hard
    /// [`FxError::RateNotFound`].
    pub fn convert(
        &self,
        amount_minor_units: i64,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<i64, FxError> {
        if from == to {
            return Ok(amount_minor_units);
        }
        let rate = self.resolve_rate(from, to, on)?;
        Ok((amount_minor_units as f64 * rate).round() as i64)
    }

    /// [`FxResolver::convert`] with the effective date defaulted to the
    /// current UTC calendar date.
    pub fn convert_today(
        &self,
        amount_minor_units: i64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<i64, FxError> {
        self.convert(amount_minor_units, from, to, Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate::RateRecord;
    use crate::store::memory::InMemoryRateStore;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ccy(code: &str) -> CurrencyCode {
        CurrencyCode::new(code)
    }

    fn pair(base: &str, quote: &str) -> CurrencyPair {
        CurrencyPair::new(ccy(base), ccy(quote))
    }

    fn record(base: &str, quote: &str, on: NaiveDate, rate: f64) -> RateRecord {
        RateRecord::new(ccy(base), ccy(quote), on, rate).unwrap()
    }

    #[test]
    fn test_identity_rate_without_store_access() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("USD"), &ccy("USD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(rate, 1.0);
        assert_eq!(store.query_count(), 0);
    }

    #[test]
    fn test_direct_rate() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.35,
        )]);
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("USD"), &ccy("CAD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(rate, 1.35);
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_most_recent_direct_rate_wins() {
        let store = InMemoryRateStore::with_records(vec![
            record("USD", "CAD", date(2024, 1, 1), 1.30),
            record("USD", "CAD", date(2024, 3, 1), 1.35),
            record("USD", "CAD", date(2024, 9, 1), 1.99),
        ]);
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("USD"), &ccy("CAD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(rate, 1.35);
    }

    #[test]
    fn test_inverse_rate() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.35,
        )]);
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("CAD"), &ccy("USD"), date(2024, 6, 1))
            .unwrap();
        assert_relative_eq!(rate, 1.0 / 1.35, epsilon = 1e-12);
        // Direct lookup first, then the inverse lookup.
        assert_eq!(store.query_count(), 2);
    }

    #[test]
    fn test_direct_preferred_over_inverse() {
        let store = InMemoryRateStore::with_records(vec![
            record("USD", "CAD", date(2024, 1, 1), 1.35),
            record("CAD", "USD", date(2024, 1, 1), 0.80),
        ]);
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("CAD"), &ccy("USD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(rate, 0.80);
    }

    #[test]
    fn test_fallback_rate() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::new(&store);

        let rate = resolver
            .resolve_rate(&ccy("USD"), &ccy("CAD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(rate, 1.35);
    }

    #[test]
    fn test_fallback_disabled() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::with_fallback(&store, FallbackRates::empty());

        let result = resolver.resolve_rate(&ccy("USD"), &ccy("CAD"), date(2024, 6, 1));
        assert!(matches!(result, Err(FxError::RateNotFound { .. })));
    }

    #[test]
    fn test_rate_not_found_carries_pair_and_date() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::new(&store);
        let on = date(2024, 6, 1);

        match resolver.resolve_rate(&ccy("XYZ"), &ccy("ABC"), on) {
            Err(FxError::RateNotFound { base, quote, date }) => {
                assert_eq!(base, ccy("XYZ"));
                assert_eq!(quote, ccy("ABC"));
                assert_eq!(date, on);
            }
            other => panic!("expected RateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_single_query() {
        let store = InMemoryRateStore::with_records(vec![
            record("USD", "CAD", date(2024, 1, 1), 1.35),
            record("EUR", "CAD", date(2024, 1, 1), 1.47),
        ]);
        let resolver = FxResolver::new(&store);

        let pairs = vec![
            pair("USD", "CAD"),
            pair("CAD", "EUR"),
            pair("EUR", "CAD"),
            pair("USD", "EUR"),
        ];
        let resolved = resolver
            .resolve_rates_batch(&pairs, date(2024, 6, 1))
            .unwrap();

        assert_eq!(store.query_count(), 1);
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved[&pair("USD", "CAD")], 1.35);
        assert_relative_eq!(resolved[&pair("CAD", "EUR")], 1.0 / 1.47, epsilon = 1e-12);
        assert_eq!(resolved[&pair("EUR", "CAD")], 1.47);
        // USD/EUR has neither direction stored; fallback table supplies it.
        assert_eq!(resolved[&pair("USD", "EUR")], 0.92);
    }

    #[test]
    fn test_batch_all_identity_skips_store() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::new(&store);

        let pairs = vec![pair("USD", "USD"), pair("CAD", "CAD")];
        let resolved = resolver
            .resolve_rates_batch(&pairs, date(2024, 6, 1))
            .unwrap();

        assert_eq!(store.query_count(), 0);
        assert_eq!(resolved[&pair("USD", "USD")], 1.0);
        assert_eq!(resolved[&pair("CAD", "CAD")], 1.0);
    }

    #[test]
    fn test_batch_degrades_unresolvable_pair_to_parity() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.35,
        )]);
        let resolver = FxResolver::with_fallback(&store, FallbackRates::empty());

        let pairs = vec![pair("USD", "CAD"), pair("XYZ", "ABC")];
        let resolved = resolver
            .resolve_rates_batch(&pairs, date(2024, 6, 1))
            .unwrap();

        // The missing pair degrades; the good pair still resolves.
        assert_eq!(resolved[&pair("XYZ", "ABC")], 1.0);
        assert_eq!(resolved[&pair("USD", "CAD")], 1.35);
    }

    #[test]
    fn test_batch_deduplicates_pairs() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.35,
        )]);
        let resolver = FxResolver::new(&store);

        let pairs = vec![pair("USD", "CAD"), pair("USD", "CAD"), pair("USD", "CAD")];
        let resolved = resolver
            .resolve_rates_batch(&pairs, date(2024, 6, 1))
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_batch_takes_most_recent_per_pair() {
        let store = InMemoryRateStore::with_records(vec![
            record("USD", "CAD", date(2024, 1, 1), 1.30),
            record("USD", "CAD", date(2024, 3, 1), 1.35),
        ]);
        let resolver = FxResolver::new(&store);

        let resolved = resolver
            .resolve_rates_batch(&[pair("USD", "CAD")], date(2024, 6, 1))
            .unwrap();
        assert_eq!(resolved[&pair("USD", "CAD")], 1.35);
    }

    #[test]
    fn test_batch_agrees_with_single_pair() {
        let store = InMemoryRateStore::with_records(vec![
            record("USD", "CAD", date(2024, 1, 1), 1.35),
            record("EUR", "CAD", date(2024, 2, 1), 1.47),
        ]);
        let resolver = FxResolver::new(&store);
        let on = date(2024, 6, 1);

        let pairs = vec![pair("USD", "CAD"), pair("CAD", "EUR")];
        let batch = resolver.resolve_rates_batch(&pairs, on).unwrap();

        for p in &pairs {
            let single = resolver.resolve_rate(&p.base, &p.quote, on).unwrap();
            assert_relative_eq!(batch[p], single, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_convert_same_currency_skips_store() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::new(&store);

        let cents = resolver
            .convert(123_456, &ccy("USD"), &ccy("USD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(cents, 123_456);
        assert_eq!(store.query_count(), 0);
    }

    #[test]
    fn test_convert_multiplies_then_rounds() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.333333,
        )]);
        let resolver = FxResolver::new(&store);

        let cents = resolver
            .convert(1000, &ccy("USD"), &ccy("CAD"), date(2024, 6, 1))
            .unwrap();
        assert_eq!(cents, 1333);
    }

    #[test]
    fn test_convert_rounds_half_away_from_zero() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.5,
        )]);
        let resolver = FxResolver::new(&store);
        let on = date(2024, 6, 1);

        assert_eq!(resolver.convert(1, &ccy("USD"), &ccy("CAD"), on).unwrap(), 2);
        assert_eq!(resolver.convert(-1, &ccy("USD"), &ccy("CAD"), on).unwrap(), -2);
    }

    #[test]
    fn test_convert_negative_amount_is_symmetric() {
        let store = InMemoryRateStore::with_records(vec![record(
            "USD",
            "CAD",
            date(2024, 1, 1),
            1.35,
        )]);
        let resolver = FxResolver::new(&store);
        let on = date(2024, 6, 1);

        let credit = resolver.convert(-1000, &ccy("USD"), &ccy("CAD"), on).unwrap();
        let charge = resolver.convert(1000, &ccy("USD"), &ccy("CAD"), on).unwrap();
        assert_eq!(credit, -charge);
        assert_eq!(charge, 1350);
    }

    #[test]
    fn test_convert_propagates_rate_not_found() {
        let store = InMemoryRateStore::new();
        let resolver = FxResolver::with_fallback(&store, FallbackRates::empty());

        let result = resolver.convert(1000, &ccy("XYZ"), &ccy("ABC"), date(2024, 6, 1));
        assert!(matches!(result, Err(FxError::RateNotFound { .. })));
    }
}
