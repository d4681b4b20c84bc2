//! Sample rate-history generation.
//!
//! Produces random-walk rate histories for demos, benchmarks, and the
//! CLI `generate` command. Only one direction per currency pair is
//! generated, so resolving the opposite direction exercises the inverse
//! path.

use crate::core::currency::CurrencyCode;
use crate::core::rate::RateRecord;
use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Configuration for generating a random rate history.
#[derive(Debug, Clone)]
pub struct RateHistoryConfig {
    /// Currencies to quote against each other.
    pub currencies: Vec<CurrencyCode>,
    /// First observation date.
    pub start: NaiveDate,
    /// Number of daily observations per pair.
    pub days: usize,
    /// Range the initial rate for each pair is drawn from.
    pub initial_rate_range: (f64, f64),
    /// Maximum relative day-over-day move (e.g. 0.01 = ±1%).
    pub max_daily_move: f64,
}

impl Default for RateHistoryConfig {
    fn default() -> Self {
        Self {
            currencies: vec![
                CurrencyCode::new("USD"),
                CurrencyCode::new("CAD"),
                CurrencyCode::new("EUR"),
            ],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            days: 30,
            initial_rate_range: (0.5, 2.0),
            max_daily_move: 0.01,
        }
    }
}

/// Generate a random-walk rate history for every distinct ordered pair
/// `(currencies[i], currencies[j])` with `i < j`.
pub fn generate_rate_history(config: &RateHistoryConfig) -> Vec<RateRecord> {
    let mut rng = rand::thread_rng();
    let mut records = Vec::new();

    for i in 0..config.currencies.len() {
        for j in (i + 1)..config.currencies.len() {
            let base = &config.currencies[i];
            let quote = &config.currencies[j];

            let (lo, hi) = config.initial_rate_range;
            let mut rate = rng.gen_range(lo..hi);

            for day in 0..config.days {
                let date = config.start + Duration::days(day as i64);
                let record = RateRecord::new(base.clone(), quote.clone(), date, rate)
                    .expect("generated rate is positive");
                records.push(record);

                let step = rng.gen_range(-config.max_daily_move..config.max_daily_move);
                rate *= 1.0 + step;
            }
        }
    }

    records
}
