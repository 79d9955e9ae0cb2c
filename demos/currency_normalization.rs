//! Currency normalization example: converting multi-currency amounts into
//! the base currency with the built-in and custom rate tables.
//!
//! Run with: cargo run --example currency_normalization

use bigdecimal::BigDecimal;
use reconciliation_core::currency::{format_amount, ExchangeRateTable};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Currency Normalization Example ===\n");

    let table = ExchangeRateTable::default();
    println!("Base currency: {}", table.base_code());
    println!("Supported currencies:");
    for code in table.supported_currencies() {
        println!("  {:4} {}", code, table.rate_info(&code));
    }

    println!("\nNormalizing amounts to {}:", table.base_code());
    let samples = [
        ("100", "USD"),
        ("250.50", "EUR"),
        ("1000", "UGX"),
        ("75", "KSh"),
        ("-40", "GBP"),
    ];
    for (amount, currency) in samples {
        let amount = BigDecimal::from_str(amount)?;
        let normalized = table.normalize(&amount, currency);
        println!(
            "  {:>14} -> {}",
            format_amount(&amount, currency),
            format_amount(&normalized.amount, table.base_code())
        );
    }

    // Unknown currencies degrade to a 1:1 rate with a warning instead of
    // stopping the run.
    let unknown = table.normalize(&BigDecimal::from(500), "JPY");
    println!(
        "\nUnknown currency: amount kept as {}, warning: {}",
        unknown.amount,
        unknown
            .warning
            .map(|w| w.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    // A custom table is just configuration.
    let mut custom = ExchangeRateTable::new("USD");
    custom.insert_rate("EUR", BigDecimal::from_str("1.08")?);
    custom.insert_rate("GBP", BigDecimal::from_str("1.27")?);
    custom.validate()?;
    println!("\nCustom USD-based table:");
    for code in custom.supported_currencies() {
        println!("  {:4} {}", code, custom.rate_info(&code));
    }
    let n = custom.normalize(&BigDecimal::from(108), "EUR");
    println!("  108 EUR -> {} USD", n.amount);

    Ok(())
}
