//! Whole-file JSON persistence for the two independent documents: the
//! transaction list and the category budgets mapping.

pub mod json_store;

pub use json_store::{DocumentStatus, JsonStore, Loaded};
