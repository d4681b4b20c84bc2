//! fx-engine CLI
//!
//! Resolve exchange rates and convert minor-unit amounts from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Resolve one pair as of a date
//! fx-engine resolve --rates rates.json --base USD --quote CAD --date 2024-06-01
//!
//! # Convert 1000 cents of USD into CAD
//! fx-engine convert --rates rates.json --amount 1000 --from USD --to CAD
//!
//! # Resolve many pairs in one store round-trip
//! fx-engine batch --rates rates.json --pairs USD:CAD,CAD:EUR --date 2024-06-01
//!
//! # Generate a random rate history for testing
//! fx-engine generate --currencies USD,CAD,EUR --days 30
//! ```

use chrono::{NaiveDate, Utc};
use fx_engine::core::currency::{CurrencyCode, CurrencyPair};
use fx_engine::core::rate::RateRecord;
use fx_engine::resolver::FxResolver;
use fx_engine::store::seed::{generate_rate_history, RateHistoryConfig};
use fx_engine::store::InMemoryRateStore;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-engine — exchange-rate resolution and minor-unit conversion

USAGE:
    fx-engine <COMMAND> [OPTIONS]

COMMANDS:
    resolve     Resolve the rate for one currency pair as of a date
    convert     Convert an integer minor-unit amount between currencies
    batch       Resolve many pairs with a single store query
    generate    Generate a random rate history (for testing)
    help        Show this message

OPTIONS (resolve):
    --rates <FILE>      Path to JSON rates file
    --base <CODE>       Base currency code
    --quote <CODE>      Quote currency code
    --date <DATE>       Effective date, YYYY-MM-DD (default: today)

OPTIONS (convert):
    --rates <FILE>      Path to JSON rates file
    --amount <N>        Amount in minor units (cents), may be negative
    --from <CODE>       Source currency code
    --to <CODE>         Target currency code
    --date <DATE>       Effective date, YYYY-MM-DD (default: today)

OPTIONS (batch):
    --rates <FILE>      Path to JSON rates file
    --pairs <LIST>      Comma-separated FROM:TO pairs (e.g. USD:CAD,CAD:EUR)
    --date <DATE>       Effective date, YYYY-MM-DD (default: today)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --currencies <LIST> Comma-separated currency codes (default: USD,CAD,EUR)
    --days <N>          Observations per pair (default: 30)
    --start <DATE>      First observation date, YYYY-MM-DD (default: 2024-01-01)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    fx-engine resolve --rates rates.json --base USD --quote CAD --date 2024-06-01
    fx-engine convert --rates rates.json --amount 1000 --from USD --to CAD
    fx-engine batch --rates rates.json --pairs USD:CAD,EUR:CAD --format json
    fx-engine generate --currencies USD,CAD,EUR,GBP --days 90 --output rates.json"#
    );
}

/// JSON schema for the rates file.
#[derive(serde::Deserialize)]
struct RatesFile {
    rates: Vec<RateRecord>,
}

/// JSON output schema for batch results.
#[derive(serde::Serialize)]
struct BatchOutput {
    effective_date: String,
    rates: Vec<PairRateOutput>,
}

#[derive(serde::Serialize)]
struct PairRateOutput {
    base: String,
    quote: String,
    rate: f64,
}

fn load_store(path: &str) -> InMemoryRateStore {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: RatesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "rates": [
    {{ "base": "USD", "quote": "CAD", "date": "2024-01-01", "rate": 1.35 }}
  ]
}}"#
        );
        process::exit(1);
    });

    InMemoryRateStore::with_records(file.rates)
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| {
        eprintln!("Invalid date '{}': {} (expected YYYY-MM-DD)", s, e);
        process::exit(1);
    })
}

fn parse_pairs(s: &str) -> Vec<CurrencyPair> {
    s.split(',')
        .map(|entry| {
            let (from, to) = entry.trim().split_once(':').unwrap_or_else(|| {
                eprintln!("Invalid pair '{}': expected FROM:TO", entry);
                process::exit(1);
            });
            CurrencyPair::new(CurrencyCode::new(from), CurrencyCode::new(to))
        })
        .collect()
}

fn require_value(args: &[String], i: usize, option: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires a value", option);
        process::exit(1);
    })
}

fn cmd_resolve(args: &[String]) {
    let mut rates_path = None;
    let mut base = None;
    let mut quote = None;
    let mut date = Utc::now().date_naive();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rates" => {
                i += 1;
                rates_path = Some(require_value(args, i, "--rates"));
            }
            "--base" => {
                i += 1;
                base = Some(require_value(args, i, "--base"));
            }
            "--quote" => {
                i += 1;
                quote = Some(require_value(args, i, "--quote"));
            }
            "--date" => {
                i += 1;
                date = parse_date(&require_value(args, i, "--date"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (path, base, quote) = match (rates_path, base, quote) {
        (Some(p), Some(b), Some(q)) => (p, b, q),
        _ => {
            eprintln!("Error: --rates, --base, and --quote are required");
            process::exit(1);
        }
    };

    let resolver = FxResolver::new(load_store(&path));
    match resolver.resolve_rate(&CurrencyCode::new(base), &CurrencyCode::new(quote), date) {
        Ok(rate) => println!("{}", rate),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_convert(args: &[String]) {
    let mut rates_path = None;
    let mut amount: Option<i64> = None;
    let mut from = None;
    let mut to = None;
    let mut date = Utc::now().date_naive();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rates" => {
                i += 1;
                rates_path = Some(require_value(args, i, "--rates"));
            }
            "--amount" => {
                i += 1;
                let raw = require_value(args, i, "--amount");
                amount = Some(raw.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid amount '{}': {}", raw, e);
                    process::exit(1);
                }));
            }
            "--from" => {
                i += 1;
                from = Some(require_value(args, i, "--from"));
            }
            "--to" => {
                i += 1;
                to = Some(require_value(args, i, "--to"));
            }
            "--date" => {
                i += 1;
                date = parse_date(&require_value(args, i, "--date"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (path, amount, from, to) = match (rates_path, amount, from, to) {
        (Some(p), Some(a), Some(f), Some(t)) => (p, a, f, t),
        _ => {
            eprintln!("Error: --rates, --amount, --from, and --to are required");
            process::exit(1);
        }
    };

    let resolver = FxResolver::new(load_store(&path));
    match resolver.convert(amount, &CurrencyCode::new(from), &CurrencyCode::new(to), date) {
        Ok(converted) => println!("{}", converted),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_batch(args: &[String]) {
    let mut rates_path = None;
    let mut pairs_str = None;
    let mut date = Utc::now().date_naive();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rates" => {
                i += 1;
                rates_path = Some(require_value(args, i, "--rates"));
            }
            "--pairs" => {
                i += 1;
                pairs_str = Some(require_value(args, i, "--pairs"));
            }
            "--date" => {
                i += 1;
                date = parse_date(&require_value(args, i, "--date"));
            }
            "--format" => {
                i += 1;
                format = require_value(args, i, "--format");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (path, pairs_str) = match (rates_path, pairs_str) {
        (Some(p), Some(s)) => (p, s),
        _ => {
            eprintln!("Error: --rates and --pairs are required");
            process::exit(1);
        }
    };

    let pairs = parse_pairs(&pairs_str);
    let resolver = FxResolver::new(load_store(&path));
    let resolved = match resolver.resolve_rates_batch(&pairs, date) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut rates: Vec<PairRateOutput> = resolved
        .iter()
        .map(|(pair, &rate)| PairRateOutput {
            base: pair.base.to_string(),
            quote: pair.quote.to_string(),
            rate,
        })
        .collect();
    rates.sort_by(|a, b| (&a.base, &a.quote).cmp(&(&b.base, &b.quote)));

    if format == "json" {
        let output = BatchOutput {
            effective_date: date.to_string(),
            rates,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("Rates as of {}:", date);
        for entry in &rates {
            println!("  {}/{}  {}", entry.base, entry.quote, entry.rate);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut currencies_str = "USD,CAD,EUR".to_string();
    let mut days = 30usize;
    let mut start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--currencies" => {
                i += 1;
                currencies_str = require_value(args, i, "--currencies");
            }
            "--days" => {
                i += 1;
                let raw = require_value(args, i, "--days");
                days = raw.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid day count '{}': {}", raw, e);
                    process::exit(1);
                });
            }
            "--start" => {
                i += 1;
                start = parse_date(&require_value(args, i, "--start"));
            }
            "--output" => {
                i += 1;
                output_path = Some(require_value(args, i, "--output"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let currencies: Vec<CurrencyCode> = currencies_str
        .split(',')
        .map(|s| CurrencyCode::new(s.trim()))
        .collect();

    let config = RateHistoryConfig {
        currencies,
        start,
        days,
        ..Default::default()
    };

    let records = generate_rate_history(&config);
    let count = records.len();

    #[derive(serde::Serialize)]
    struct OutputFile {
        rates: Vec<RateRecord>,
    }

    let json = serde_json::to_string_pretty(&OutputFile { rates: records }).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} rate records → {}", count, path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "resolve" => cmd_resolve(rest),
        "convert" => cmd_convert(rest),
        "batch" => cmd_batch(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
