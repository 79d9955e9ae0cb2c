//! # Reconciliation Core
//!
//! A library for reconciling two independently produced ledgers of financial
//! transactions — an internal record set and a provider (counterparty)
//! record set — identifying which transactions agree, which are missing from
//! one side, and which disagree on amount or status despite sharing a
//! reference.
//!
//! ## Features
//!
//! - **Reconciliation engine**: reference-based matching with tolerance-based
//!   amount comparison and exact status comparison
//! - **Currency normalization**: multi-currency amounts converted into a
//!   common base currency via a static, injectable exchange-rate table
//! - **CSV ingestion**: transfer-format parsing with schema validation and
//!   per-row filtering of malformed records
//! - **CSV export**: matched/unmatched/discrepant collections serialized
//!   back out, round-tripping unknown input columns
//! - **Summary statistics**: per-run counts and match rate for reporting
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{ExchangeRateTable, ReconciliationEngine, Transaction};
//! use bigdecimal::BigDecimal;
//!
//! let internal = vec![Transaction::new("T1", BigDecimal::from(100), "Completed")];
//! let provider = vec![Transaction::new("T1", BigDecimal::from(100), "Completed")];
//!
//! let engine = ReconciliationEngine::new(ExchangeRateTable::default());
//! let result = engine.reconcile(&internal, &provider);
//! assert!(result.is_clean());
//! ```

pub mod currency;
pub mod export;
pub mod ingestion;
pub mod reconciliation;
pub mod types;

// Re-export commonly used types
pub use currency::{CurrencyError, CurrencyWarning, ExchangeRateTable, Normalized};
pub use ingestion::{IngestError, IngestResult};
pub use reconciliation::*;
pub use types::*;
