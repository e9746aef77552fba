//! Points ledger: append-only grants/debits backing the cached user balance.

pub mod ledger;
pub mod models;

pub use ledger::PointsLedger;
pub use models::{PointsEntry, PointsKind, PointsReason};
