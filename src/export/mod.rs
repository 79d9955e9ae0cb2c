//! CSV export of reconciliation output
//!
//! Serializes any of the result collections back into transfer format so
//! they can be shared or fed into other systems. Field values containing
//! the delimiter are quoted by the writer.

use std::io::Write;

use crate::types::{Discrepancy, Transaction};

/// Errors raised while exporting reconciliation output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Write a transaction collection (`matched`, `internal_only`, or
/// `provider_only`) as CSV.
///
/// Columns are `transaction_reference, amount, currency, status`, followed
/// by any metadata columns present on the first record (sorted by name, so
/// unknown input columns round-trip deterministically). A transaction
/// without a currency is written as `base_currency`.
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    base_currency: &str,
    writer: W,
) -> ExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut extra_columns: Vec<String> = transactions
        .first()
        .map(|tx| tx.metadata.keys().cloned().collect())
        .unwrap_or_default();
    extra_columns.sort();

    let mut header = vec![
        "transaction_reference".to_string(),
        "amount".to_string(),
        "currency".to_string(),
        "status".to_string(),
    ];
    header.extend(extra_columns.iter().cloned());
    csv_writer.write_record(&header)?;

    for tx in transactions {
        let mut record = vec![
            tx.reference.clone(),
            tx.amount.to_string(),
            tx.currency_or(base_currency).to_string(),
            tx.status.clone(),
        ];
        for column in &extra_columns {
            record.push(tx.metadata.get(column).cloned().unwrap_or_default());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the discrepancy collection as CSV with columns
/// `transaction_reference, internal_amount, provider_amount,
/// internal_status, provider_status`. Amounts are the normalized
/// (base-currency) values used for comparison.
pub fn write_discrepancies_csv<W: Write>(
    discrepancies: &[Discrepancy],
    writer: W,
) -> ExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record([
        "transaction_reference",
        "internal_amount",
        "provider_amount",
        "internal_status",
        "provider_status",
    ])?;

    for d in discrepancies {
        csv_writer.write_record([
            d.transaction.reference.as_str(),
            &d.internal_amount.to_string(),
            &d.provider_amount.to_string(),
            &d.internal_status,
            &d.provider_status,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn export_to_string(transactions: &[Transaction]) -> String {
        let mut buffer = Vec::new();
        write_transactions_csv(transactions, "KSh", &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_transaction_export() {
        let transactions = vec![
            Transaction::with_currency("T1", BigDecimal::from(100), "Completed", "USD"),
            Transaction::new("T2", BigDecimal::from_str("-42.50").unwrap(), "Refunded"),
        ];

        let csv = export_to_string(&transactions);

        assert_eq!(
            csv,
            "transaction_reference,amount,currency,status\n\
             T1,100,USD,Completed\n\
             T2,-42.50,KSh,Refunded\n"
        );
    }

    #[test]
    fn test_metadata_columns_round_trip() {
        let mut tx = Transaction::new("T1", BigDecimal::from(10), "Completed");
        tx.metadata.insert("channel".to_string(), "mobile".to_string());
        tx.metadata.insert("branch".to_string(), "Nairobi".to_string());

        let csv = export_to_string(&[tx]);

        // Metadata columns come after the fixed four, sorted by name.
        assert_eq!(
            csv,
            "transaction_reference,amount,currency,status,branch,channel\n\
             T1,10,KSh,Completed,Nairobi,mobile\n"
        );
    }

    #[test]
    fn test_delimiter_in_value_is_quoted() {
        let tx = Transaction::new("T1", BigDecimal::from(10), "Completed, manually");

        let csv = export_to_string(&[tx]);

        assert!(csv.contains("\"Completed, manually\""));
    }

    #[test]
    fn test_discrepancy_export() {
        let d = Discrepancy {
            transaction: Transaction::new("T1", BigDecimal::from(100), "Completed"),
            internal_amount: BigDecimal::from(100),
            provider_amount: BigDecimal::from(99),
            internal_status: "Completed".to_string(),
            provider_status: "Pending".to_string(),
            internal_currency: "KSh".to_string(),
            provider_currency: "KSh".to_string(),
        };

        let mut buffer = Vec::new();
        write_discrepancies_csv(&[d], &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert_eq!(
            csv,
            "transaction_reference,internal_amount,provider_amount,internal_status,provider_status\n\
             T1,100,99,Completed,Pending\n"
        );
    }

    #[test]
    fn test_empty_collection_writes_header_only() {
        let csv = export_to_string(&[]);
        assert_eq!(csv, "transaction_reference,amount,currency,status\n");
    }
}
