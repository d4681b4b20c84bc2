//! Basic rate resolution and conversion example.
//!
//! Demonstrates the fallback chain: direct rate, inverse rate, static
//! fallback table, and the hard failure when nothing resolves.

use chrono::NaiveDate;
use fx_engine::core::currency::CurrencyCode;
use fx_engine::core::rate::RateRecord;
use fx_engine::resolver::{FallbackRates, FxResolver};
use fx_engine::store::InMemoryRateStore;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-engine: Basic Conversion Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let jun = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let usd = CurrencyCode::new("USD");
    let cad = CurrencyCode::new("CAD");
    let eur = CurrencyCode::new("EUR");

    // Only USD/CAD is stored; every other direction is derived.
    let store = InMemoryRateStore::with_records(vec![RateRecord::new(
        usd.clone(),
        cad.clone(),
        jan,
        1.35,
    )
    .unwrap()]);
    let resolver = FxResolver::new(store);

    // --- Scenario 1: Direct rate ---
    println!("━━━ Scenario 1: Direct Rate ━━━\n");
    let rate = resolver.resolve_rate(&usd, &cad, jun).unwrap();
    println!("USD/CAD as of {}: {}", jun, rate);
    println!("$10.00 USD → {} CAD cents", resolver.convert(1000, &usd, &cad, jun).unwrap());
    println!();

    // --- Scenario 2: Inverse rate ---
    println!("━━━ Scenario 2: Inverse Rate ━━━\n");
    let rate = resolver.resolve_rate(&cad, &usd, jun).unwrap();
    println!("CAD/USD derived as 1/1.35 = {:.4}", rate);
    println!();

    // --- Scenario 3: Static fallback (logged as a warning) ---
    println!("━━━ Scenario 3: Static Fallback ━━━\n");
    let rate = resolver.resolve_rate(&usd, &eur, jun).unwrap();
    println!("USD/EUR from the fallback table: {}", rate);
    println!();

    // --- Scenario 4: Hard failure with fallback disabled ---
    println!("━━━ Scenario 4: RateNotFound ━━━\n");
    let store = InMemoryRateStore::new();
    let strict = FxResolver::with_fallback(store, FallbackRates::empty());
    match strict.resolve_rate(&usd, &eur, jun) {
        Ok(rate) => println!("unexpected rate: {}", rate),
        Err(e) => println!("resolution failed as expected: {}", e),
    }
}
