use chrono::{Datelike, NaiveDate};

use crate::ledger::{normalize_category, Budgets, EntryKind, Transaction};

const WARNING_RATIO: f64 = 0.8;

/// Classification of current-month spend against a configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

/// Outcome of a budget check for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetEvaluation {
    pub status: BudgetStatus,
    pub spent: f64,
    /// `None` when the category has no configured budget; the check then
    /// reports `Ok` rather than failing.
    pub limit: Option<f64>,
}

/// Compares the category's expense total for the calendar month of `today`
/// against its configured monthly limit.
///
/// The shell runs this check against the ledger as it stands *before* the
/// transaction being entered is appended: the alert deliberately reflects
/// pre-insertion spend (check-before-commit), and the category is captured
/// from input before the check runs.
pub fn evaluate_budget(
    transactions: &[Transaction],
    budgets: &Budgets,
    category: &str,
    today: NaiveDate,
) -> BudgetEvaluation {
    let name = normalize_category(category);
    let Some(limit) = budgets.limit(&name) else {
        return BudgetEvaluation {
            status: BudgetStatus::Ok,
            spent: 0.0,
            limit: None,
        };
    };

    let spent: f64 = transactions
        .iter()
        .filter(|txn| txn.kind == EntryKind::Expense)
        .filter(|txn| normalize_category(&txn.category) == name)
        .filter(|txn| {
            txn.calendar_date()
                .map(|date| date.year() == today.year() && date.month() == today.month())
                .unwrap_or(false)
        })
        .map(|txn| txn.amount)
        .sum();

    let status = if spent > limit {
        BudgetStatus::Exceeded
    } else if spent > WARNING_RATIO * limit {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    };

    BudgetEvaluation {
        status,
        spent,
        limit: Some(limit),
    }
}
