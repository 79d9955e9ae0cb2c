//! The reconciliation engine: classifies two transaction sets into
//! matched, one-side-only, and discrepant collections

use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::currency::{CurrencyWarning, ExchangeRateTable};
use crate::types::{Discrepancy, ReconciliationResult, Transaction};

/// Shorthand for the default tolerance, 0.01 base-currency units.
fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// Matches an internal transaction set against a provider transaction set.
///
/// The engine is a pure, synchronous computation: it holds only its
/// configuration (rate table and tolerance), never mutates its inputs, and
/// keeps no state between invocations, so one engine can serve any number of
/// concurrent reconciliation jobs.
///
/// The rate table is explicit configuration supplied at construction; there
/// is no hidden global default. [`ExchangeRateTable::default`] is the
/// built-in instance for callers that want it.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    rates: ExchangeRateTable,
    /// Maximum absolute normalized-amount difference still considered a
    /// match. Fixed and absolute (currency minor units), not relative.
    tolerance: BigDecimal,
}

impl ReconciliationEngine {
    /// Create an engine with the given rate table and the default tolerance
    /// of 0.01 base-currency units.
    pub fn new(rates: ExchangeRateTable) -> Self {
        Self {
            rates,
            tolerance: default_tolerance(),
        }
    }

    /// Create an engine with an explicit amount tolerance.
    pub fn with_tolerance(rates: ExchangeRateTable, tolerance: BigDecimal) -> Self {
        Self { rates, tolerance }
    }

    /// The rate table this engine normalizes against.
    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// Reconcile an internal transaction set against a provider set.
    ///
    /// Every internal transaction is classified as `matched` (a provider
    /// transaction shares its reference) or `internal_only`; every provider
    /// transaction without an internal counterpart lands in `provider_only`.
    /// Matched pairs whose normalized amounts differ by at least the
    /// tolerance, or whose status strings differ exactly, are additionally
    /// recorded in `discrepancies`.
    ///
    /// Total function over well-formed input: references are assumed
    /// non-empty and amounts finite (the ingestion layer's contract), and
    /// unknown currencies degrade to 1:1 with a warning rather than failing.
    /// Output collections preserve input order.
    pub fn reconcile(
        &self,
        internal: &[Transaction],
        provider: &[Transaction],
    ) -> ReconciliationResult {
        let mut warnings: Vec<CurrencyWarning> = Vec::new();

        // Index both sides by reference with amounts normalized to the base
        // currency. Duplicate references within one side: last wins.
        let mut internal_normalized: HashMap<&str, BigDecimal> =
            HashMap::with_capacity(internal.len());
        for tx in internal {
            let n = self
                .rates
                .normalize(&tx.amount, tx.currency_or(self.rates.base_code()));
            warnings.extend(n.warning);
            internal_normalized.insert(tx.reference.as_str(), n.amount);
        }

        let mut provider_normalized: HashMap<&str, (&Transaction, BigDecimal)> =
            HashMap::with_capacity(provider.len());
        for tx in provider {
            let n = self
                .rates
                .normalize(&tx.amount, tx.currency_or(self.rates.base_code()));
            warnings.extend(n.warning);
            provider_normalized.insert(tx.reference.as_str(), (tx, n.amount));
        }

        let mut matched = Vec::new();
        let mut internal_only = Vec::new();
        let mut provider_only = Vec::new();
        let mut discrepancies = Vec::new();

        // Matching pass walks the original internal sequence, not the
        // deduplicated lookup, so a duplicated reference is reported once
        // per occurrence while being compared against the single retained
        // normalized amount.
        for tx in internal {
            let Some((provider_tx, provider_amount)) =
                provider_normalized.get(tx.reference.as_str())
            else {
                internal_only.push(tx.clone());
                continue;
            };

            matched.push(tx.clone());

            let internal_amount = &internal_normalized[tx.reference.as_str()];
            let amounts_match = (internal_amount - provider_amount).abs() < self.tolerance;
            let statuses_match = tx.status == provider_tx.status;

            if !amounts_match || !statuses_match {
                discrepancies.push(Discrepancy {
                    transaction: tx.clone(),
                    internal_amount: internal_amount.clone(),
                    provider_amount: provider_amount.clone(),
                    internal_status: tx.status.clone(),
                    provider_status: provider_tx.status.clone(),
                    internal_currency: tx.currency_or(self.rates.base_code()).to_string(),
                    provider_currency: provider_tx
                        .currency_or(self.rates.base_code())
                        .to_string(),
                });
            }
        }

        for tx in provider {
            if !internal_normalized.contains_key(tx.reference.as_str()) {
                provider_only.push(tx.clone());
            }
        }

        ReconciliationResult {
            matched,
            internal_only,
            provider_only,
            discrepancies,
            warnings,
        }
    }
}

/// Reconcile two transaction sets with the given rate table and the default
/// tolerance. Convenience wrapper around [`ReconciliationEngine`].
pub fn reconcile(
    internal: &[Transaction],
    provider: &[Transaction],
    rates: ExchangeRateTable,
) -> ReconciliationResult {
    ReconciliationEngine::new(rates).reconcile(internal, provider)
}
