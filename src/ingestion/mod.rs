//! CSV ingestion of transaction sets
//!
//! Reads a transfer-format file into validated [`Transaction`] records. The
//! header must carry `transaction_reference`, `amount`, and `status`;
//! `currency` is optional and defaults to the base currency downstream.
//! Rows with a blank reference or an unparseable amount are dropped before
//! reconciliation ever sees them; structural problems reject the whole
//! input with a classified error.

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::types::Transaction;

/// Header fields every transaction CSV must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["transaction_reference", "amount", "status"];

/// The optional currency header field.
pub const CURRENCY_COLUMN: &str = "currency";

/// Errors raised while ingesting a transaction CSV.
///
/// All are terminal for that input; reconciliation never starts on
/// partially-valid data.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Input is not recognizable as the expected transfer format.
    #[error("Unrecognized input format: {0}")]
    Format(String),
    /// The CSV decoder itself failed on malformed content.
    #[error("CSV parsing error: {0}")]
    Parsing(#[from] csv::Error),
    /// Required header fields are absent.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Read transactions from a CSV file, rejecting non-CSV paths up front.
pub fn read_transactions_file(path: impl AsRef<Path>) -> IngestResult<Vec<Transaction>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(IngestError::Format(format!(
            "expected a .csv file, got {}",
            path.display()
        )));
    }

    read_transactions_csv(File::open(path)?)
}

/// Read transactions from CSV content.
///
/// Validates the header against [`REQUIRED_COLUMNS`], then decodes row by
/// row. A row lacking a non-empty reference or a parseable numeric amount
/// is silently dropped (logged at debug level). Columns beyond the known
/// four are preserved in each transaction's `metadata`.
pub fn read_transactions_csv<R: Read>(reader: R) -> IngestResult<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut transactions = Vec::new();
    for record in csv_reader.records() {
        let record = record?;

        let reference = record.get(columns.reference).unwrap_or("");
        if reference.is_empty() {
            tracing::debug!("dropping row with blank transaction_reference");
            continue;
        }

        let raw_amount = record.get(columns.amount).unwrap_or("");
        let amount = match BigDecimal::from_str(raw_amount) {
            Ok(amount) => amount,
            Err(_) => {
                tracing::debug!(
                    reference = %reference,
                    amount = %raw_amount,
                    "dropping row with unparseable amount"
                );
                continue;
            }
        };

        let status = record.get(columns.status).unwrap_or("").to_string();
        let currency = columns
            .currency
            .and_then(|i| record.get(i))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let mut metadata = HashMap::new();
        for (i, value) in record.iter().enumerate() {
            if columns.is_known(i) {
                continue;
            }
            if let Some(name) = headers.get(i) {
                metadata.insert(name.to_string(), value.to_string());
            }
        }

        transactions.push(Transaction {
            reference: reference.to_string(),
            amount,
            status,
            currency,
            metadata,
        });
    }

    Ok(transactions)
}

/// Resolved header indices for the known columns.
struct ColumnIndices {
    reference: usize,
    amount: usize,
    status: usize,
    currency: Option<usize>,
}

impl ColumnIndices {
    fn is_known(&self, index: usize) -> bool {
        index == self.reference
            || index == self.amount
            || index == self.status
            || self.currency == Some(index)
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> IngestResult<ColumnIndices> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    Ok(ColumnIndices {
        reference: position("transaction_reference").unwrap_or_default(),
        amount: position("amount").unwrap_or_default(),
        status: position("status").unwrap_or_default(),
        currency: position(CURRENCY_COLUMN),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_valid_csv() {
        let data = "\
transaction_reference,amount,status,currency
T1,100.50,Completed,KSh
T2,-25,Refunded,USD
T3,10,Pending,
";
        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].reference, "T1");
        assert_eq!(transactions[0].amount, BigDecimal::from_str("100.50").unwrap());
        assert_eq!(transactions[0].currency.as_deref(), Some("KSh"));
        assert_eq!(transactions[1].amount, BigDecimal::from(-25));
        // Blank currency cell means base currency.
        assert_eq!(transactions[2].currency, None);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let data = "transaction_reference,value\nT1,100\n";
        let err = read_transactions_csv(data.as_bytes()).unwrap_err();

        match err {
            IngestError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["amount".to_string(), "status".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_rows_dropped_silently() {
        let data = "\
transaction_reference,amount,status
,100,Completed
T2,not-a-number,Completed
T3,42,Completed
";
        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].reference, "T3");
    }

    #[test]
    fn test_unknown_columns_preserved_as_metadata() {
        let data = "\
transaction_reference,amount,status,channel,branch
T1,100,Completed,mobile,Nairobi
";
        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        let tx = &transactions[0];
        assert_eq!(tx.metadata.get("channel").map(String::as_str), Some("mobile"));
        assert_eq!(tx.metadata.get("branch").map(String::as_str), Some("Nairobi"));
        assert!(!tx.metadata.contains_key("status"));
    }

    #[test]
    fn test_column_order_is_flexible() {
        let data = "\
status,currency,amount,transaction_reference
Completed,USD,10,T1
";
        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(transactions[0].reference, "T1");
        assert_eq!(transactions[0].amount, BigDecimal::from(10));
        assert_eq!(transactions[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_quoted_delimiter_in_field() {
        let data = "\
transaction_reference,amount,status,note
T1,100,Completed,\"paid, in two parts\"
";
        let transactions = read_transactions_csv(data.as_bytes()).unwrap();
        assert_eq!(
            transactions[0].metadata.get("note").map(String::as_str),
            Some("paid, in two parts")
        );
    }

    #[test]
    fn test_non_csv_path_is_a_format_error() {
        let err = read_transactions_file("transactions.xlsx").unwrap_err();
        assert!(matches!(err, IngestError::Format(_)));
    }
}
