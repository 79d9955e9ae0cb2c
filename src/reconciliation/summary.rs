//! Summary statistics derived from a reconciliation result

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ReconciliationResult;

/// Aggregate counts and match rate for one reconciliation run.
///
/// Derived entirely from a [`ReconciliationResult`]; the run id and
/// timestamp identify the snapshot for downstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Identifier for this reconciliation run.
    pub run_id: Uuid,
    /// When the summary was generated (UTC).
    pub generated_at: NaiveDateTime,
    /// Transactions present on both sides by reference.
    pub matched: usize,
    /// Transactions present only in the internal set.
    pub internal_only: usize,
    /// Transactions present only in the provider set.
    pub provider_only: usize,
    /// Matched pairs with an amount or status disagreement.
    pub discrepancies: usize,
    /// All classified transactions: matched + internal-only + provider-only.
    pub total_transactions: usize,
    /// Percentage of classified transactions that matched (0.0 when there
    /// were no transactions at all).
    pub match_rate: f64,
}

impl ReconciliationSummary {
    /// Summarize a reconciliation result.
    pub fn from_result(result: &ReconciliationResult) -> Self {
        let matched = result.matched.len();
        let internal_only = result.internal_only.len();
        let provider_only = result.provider_only.len();
        let total = matched + internal_only + provider_only;

        let match_rate = if total > 0 {
            matched as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            run_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().naive_utc(),
            matched,
            internal_only,
            provider_only,
            discrepancies: result.discrepancies.len(),
            total_transactions: total,
            match_rate,
        }
    }
}
