//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::currency::CurrencyWarning;

/// A single financial transaction as reported by one side of the
/// reconciliation (internal ledger or provider statement).
///
/// Transactions are immutable value records: the engine never mutates its
/// input, it only computes derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier joining an internal transaction to its provider
    /// counterpart. Non-empty; matched by exact, case-sensitive equality.
    pub reference: String,
    /// Transaction amount in `currency` units. Negative amounts (refunds,
    /// reversals) are valid.
    pub amount: BigDecimal,
    /// Free-form status label ("Completed", "Pending", ...), compared by
    /// exact string equality, not enumerated.
    pub status: String,
    /// Currency code of `amount`. `None` means the base currency.
    pub currency: Option<String>,
    /// Unrecognized input columns, preserved so exports can round-trip them.
    /// The engine ignores this field entirely.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Transaction {
    /// Create a transaction denominated in the base currency.
    pub fn new(
        reference: impl Into<String>,
        amount: BigDecimal,
        status: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            amount,
            status: status.into(),
            currency: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a transaction denominated in an explicit currency.
    pub fn with_currency(
        reference: impl Into<String>,
        amount: BigDecimal,
        status: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            currency: Some(currency.into()),
            ..Self::new(reference, amount, status)
        }
    }

    /// The effective currency code: the transaction's own, or `base` when
    /// none was supplied.
    pub fn currency_or<'a>(&'a self, base: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(base)
    }
}

/// A matched-by-reference pair whose normalized amounts or status strings
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// The internal transaction, with its original (non-normalized) amount
    /// and currency fields intact.
    pub transaction: Transaction,
    /// Internal amount after normalization to the base currency.
    pub internal_amount: BigDecimal,
    /// Provider amount after normalization to the base currency.
    pub provider_amount: BigDecimal,
    /// Raw internal status string.
    pub internal_status: String,
    /// Raw provider status string.
    pub provider_status: String,
    /// Original internal currency code (base code when absent).
    pub internal_currency: String,
    /// Original provider currency code (base code when absent).
    pub provider_currency: String,
}

/// The complete outcome of one reconciliation pass.
///
/// Created fresh on every invocation of the engine; a one-shot computed
/// snapshot with no mutation after construction. Each collection preserves
/// input accumulation order.
///
/// A transaction that matches perfectly appears in `matched` and not in
/// `discrepancies`; one that matches by reference but differs in amount or
/// status appears in both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReconciliationResult {
    /// Internal transactions with a same-reference provider counterpart,
    /// regardless of agreement.
    pub matched: Vec<Transaction>,
    /// Internal transactions with no provider counterpart by reference.
    pub internal_only: Vec<Transaction>,
    /// Provider transactions with no internal counterpart by reference.
    pub provider_only: Vec<Transaction>,
    /// Matched pairs disagreeing on normalized amount or status.
    pub discrepancies: Vec<Discrepancy>,
    /// Unknown-currency fallbacks observed while normalizing, in occurrence
    /// order (internal side first). Advisory only; never aborts the pass.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CurrencyWarning>,
}

impl ReconciliationResult {
    /// True when every transaction matched cleanly on both sides.
    pub fn is_clean(&self) -> bool {
        self.internal_only.is_empty()
            && self.provider_only.is_empty()
            && self.discrepancies.is_empty()
    }
}
