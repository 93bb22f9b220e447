//! Ledger domain models, persistence-friendly types, and helpers.

pub mod budget;
pub mod transaction;

pub use budget::Budgets;
pub use transaction::{normalize_category, parse_amount, parse_date, EntryKind, Transaction};
