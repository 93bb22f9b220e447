use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Parses user input case-insensitively (`income`/`expense`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Capitalized label for table rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

/// One income or expense event.
///
/// The `date` field keeps the raw string the user entered. Date-keyed
/// operations parse it on demand: sorting and filtering fall back to
/// lexicographic string order for unparsable dates, while monthly
/// aggregation skips and reports them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Stable identity assigned at creation. Documents written before the
    /// identifier existed load with a freshly generated one.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl Transaction {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date: date.into(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Calendar date of this transaction, if the stored string parses.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date).ok()
    }
}

/// Canonical category form used for every comparison: trimmed, with each
/// whitespace-separated word title-cased (`" food  and drink "` becomes
/// `"Food And Drink"`).
pub fn normalize_category(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parses a user-entered amount, rejecting anything that is not a strictly
/// positive finite number.
pub fn parse_amount(raw: &str) -> Result<f64, LedgerError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(trimmed.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::InvalidAmount(trimmed.to_string()));
    }
    Ok(value)
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_title_cases() {
        assert_eq!(normalize_category("  grocery shopping "), "Grocery Shopping");
        assert_eq!(normalize_category("RENT"), "Rent");
        assert_eq!(normalize_category("food"), "Food");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn parse_amount_accepts_positive_numbers() {
        assert_eq!(parse_amount("120.50").unwrap(), 120.50);
        assert_eq!(parse_amount("  3 ").unwrap(), 3.0);
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert!(matches!(
            parse_amount("abc"),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("-5"),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("0"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_date_requires_iso_form() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(matches!(
            parse_date("29/02/2024"),
            Err(LedgerError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date("soon"),
            Err(LedgerError::InvalidDate(_))
        ));
    }

    #[test]
    fn entry_kind_parses_case_insensitively() {
        assert_eq!(EntryKind::parse(" Income "), Some(EntryKind::Income));
        assert_eq!(EntryKind::parse("EXPENSE"), Some(EntryKind::Expense));
        assert_eq!(EntryKind::parse("transfer"), None);
    }

    #[test]
    fn documents_without_identifier_still_load() {
        let json = r#"{
            "type": "expense",
            "amount": 45.0,
            "category": "Food",
            "description": "lunch",
            "date": "2025-01-10"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(!txn.id.is_nil());
        assert_eq!(txn.kind, EntryKind::Expense);
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let txn = Transaction::new(EntryKind::Income, 2500.0, "Salary", "March pay", "2025-03-01");
        let json = serde_json::to_string(&txn).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txn);
        assert!(json.contains("\"type\":\"income\""));
    }
}
