//! Multi-currency report example.
//!
//! Converts a batch of invoice totals into a home currency using a
//! single store query, the way a reporting layer would.

use chrono::NaiveDate;
use fx_engine::core::currency::{CurrencyCode, CurrencyPair};
use fx_engine::resolver::FxResolver;
use fx_engine::store::seed::{generate_rate_history, RateHistoryConfig};
use fx_engine::store::InMemoryRateStore;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-engine: Multi-Currency Report        ║");
    println!("╚══════════════════════════════════════════╝\n");

    let currencies = vec![
        CurrencyCode::new("CAD"),
        CurrencyCode::new("USD"),
        CurrencyCode::new("EUR"),
        CurrencyCode::new("GBP"),
    ];
    let config = RateHistoryConfig {
        currencies: currencies.clone(),
        days: 60,
        ..Default::default()
    };
    let store = InMemoryRateStore::with_records(generate_rate_history(&config));
    let resolver = FxResolver::new(store);

    let home = CurrencyCode::new("CAD");
    let on = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();

    // Invoice totals in minor units (cents) of their own currency.
    let invoices = [
        ("INV-1001", 125_000_i64, CurrencyCode::new("USD")),
        ("INV-1002", 80_000, CurrencyCode::new("EUR")),
        ("INV-1003", 42_500, CurrencyCode::new("GBP")),
        ("INV-1004", 99_999, CurrencyCode::new("CAD")),
    ];

    let pairs: Vec<CurrencyPair> = invoices
        .iter()
        .map(|(_, _, ccy)| CurrencyPair::new(ccy.clone(), home.clone()))
        .collect();

    // One store round-trip for the whole report.
    let rates = resolver.resolve_rates_batch(&pairs, on).unwrap();
    println!("Resolved {} pairs with {} store query\n", rates.len(), resolver.store().query_count());

    let mut total = 0i64;
    for (number, amount, ccy) in &invoices {
        let rate = rates[&CurrencyPair::new(ccy.clone(), home.clone())];
        let converted = (*amount as f64 * rate).round() as i64;
        total += converted;
        println!(
            "{}  {:>10} {} cents  →  {:>10} {} cents  (rate {:.4})",
            number, amount, ccy, converted, home, rate
        );
    }

    println!("\nReport total: {} {} cents", total, home);
}
