use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::normalize_category;

/// Per-category monthly spending limits.
///
/// One limit per normalized category name; the same limit applies to every
/// month. Serializes as a flat `{"Category": limit}` mapping, which is the
/// on-disk budgets document.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Budgets(BTreeMap<String, f64>);

impl Budgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the monthly limit for a category and returns the normalized
    /// name it was stored under. Limits must be strictly positive.
    pub fn set(&mut self, category: &str, limit: f64) -> Result<String, LedgerError> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(LedgerError::InvalidAmount(limit.to_string()));
        }
        let name = normalize_category(category);
        self.0.insert(name.clone(), limit);
        Ok(name)
    }

    /// Looks up the limit for a category by normalized name.
    pub fn limit(&self, category: &str) -> Option<f64> {
        self.0.get(&normalize_category(category)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, limit)| (name.as_str(), *limit))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
