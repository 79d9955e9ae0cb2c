//! Reconciliation module: the matching engine and derived summary statistics

pub mod engine;
pub mod summary;

pub use engine::*;
pub use summary::*;
