//! Basic reconciliation example demonstrating the full workflow:
//! ingest two CSV transaction sets, reconcile them, print a summary, and
//! export the discrepancies.
//!
//! Run with: cargo run --example basic_reconciliation

use bigdecimal::BigDecimal;
use reconciliation_core::{
    currency::format_amount,
    export::write_discrepancies_csv,
    ingestion::read_transactions_csv,
    ExchangeRateTable, ReconciliationEngine, ReconciliationSummary,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Transaction Reconciliation Example ===\n");

    let internal_csv = "\
transaction_reference,amount,status,currency
TXN001,15000,Completed,KSh
TXN002,100,Completed,USD
TXN003,2500,Pending,KSh
TXN004,7200,Completed,KSh
";
    let provider_csv = "\
transaction_reference,amount,status,currency
TXN001,15000,Completed,KSh
TXN002,12987.01,Completed,KSh
TXN004,7200,Failed,KSh
TXN005,480,Completed,KSh
";

    let internal = read_transactions_csv(internal_csv.as_bytes())?;
    let provider = read_transactions_csv(provider_csv.as_bytes())?;
    println!(
        "Loaded {} internal and {} provider transactions\n",
        internal.len(),
        provider.len()
    );

    let engine = ReconciliationEngine::new(ExchangeRateTable::default());
    let result = engine.reconcile(&internal, &provider);
    let base = engine.rates().base_code();

    println!("Matched ({}):", result.matched.len());
    for tx in &result.matched {
        println!(
            "  {} {} [{}]",
            tx.reference,
            format_amount(&tx.amount, tx.currency_or(base)),
            tx.status
        );
    }

    println!("\nInternal only ({}):", result.internal_only.len());
    for tx in &result.internal_only {
        println!(
            "  {} {}",
            tx.reference,
            format_amount(&tx.amount, tx.currency_or(base))
        );
    }

    println!("\nProvider only ({}):", result.provider_only.len());
    for tx in &result.provider_only {
        println!(
            "  {} {}",
            tx.reference,
            format_amount(&tx.amount, tx.currency_or(base))
        );
    }

    println!("\nDiscrepancies ({}):", result.discrepancies.len());
    for d in &result.discrepancies {
        println!(
            "  {} internal={} provider={} status: {} vs {}",
            d.transaction.reference,
            format_amount(&d.internal_amount, base),
            format_amount(&d.provider_amount, base),
            d.internal_status,
            d.provider_status
        );
    }

    let summary = ReconciliationSummary::from_result(&result);
    println!(
        "\nRun {}: {}/{} matched ({:.1}%)",
        summary.run_id, summary.matched, summary.total_transactions, summary.match_rate
    );

    let mut discrepancy_csv = Vec::new();
    write_discrepancies_csv(&result.discrepancies, &mut discrepancy_csv)?;
    println!("\nDiscrepancy export:\n{}", String::from_utf8(discrepancy_csv)?);

    // A wider tolerance absorbs small rounding differences that the
    // default 0.01 would flag.
    let tolerant =
        ReconciliationEngine::with_tolerance(ExchangeRateTable::default(), BigDecimal::from(1));
    let loose = tolerant.reconcile(&internal, &provider);
    println!(
        "With tolerance of 1.00: {} discrepancies (default tolerance: {})",
        loose.discrepancies.len(),
        result.discrepancies.len()
    );

    Ok(())
}
