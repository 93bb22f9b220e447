//! Query and aggregation engine over the flat transaction list: sorting,
//! filtering, category totals, and monthly income/expense summaries.

pub mod alerts;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::errors::LedgerError;
use crate::ledger::{normalize_category, parse_date, EntryKind, Transaction};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Ordering applied to a transaction listing.
///
/// Date keys compare the stored strings directly: ISO dates order
/// chronologically that way, and unparsable dates fall back to plain
/// lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortKey {
    /// Parses a user-supplied sort key. `None` means the caller keeps the
    /// input order unchanged.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date-desc" | "newest" => Some(Self::DateDesc),
            "date-asc" | "oldest" => Some(Self::DateAsc),
            "amount-desc" | "highest" => Some(Self::AmountDesc),
            "amount-asc" | "lowest" => Some(Self::AmountAsc),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::DateDesc => "Date (newest first)",
            Self::DateAsc => "Date (oldest first)",
            Self::AmountDesc => "Amount (highest first)",
            Self::AmountAsc => "Amount (lowest first)",
        }
    }
}

/// Stable in-place sort; equal keys keep their original relative order.
pub fn sort(transactions: &mut [Transaction], key: SortKey) {
    match key {
        SortKey::DateDesc => transactions.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::DateAsc => transactions.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::AmountDesc => transactions.sort_by(|a, b| compare_amounts(b, a)),
        SortKey::AmountAsc => transactions.sort_by(|a, b| compare_amounts(a, b)),
    }
}

fn compare_amounts(a: &Transaction, b: &Transaction) -> Ordering {
    a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal)
}

/// Case-insensitive, trimmed exact match on the category label.
pub fn filter_by_category(transactions: &[Transaction], category: &str) -> Vec<Transaction> {
    let needle = category.trim().to_lowercase();
    transactions
        .iter()
        .filter(|txn| txn.category.trim().to_lowercase() == needle)
        .cloned()
        .collect()
}

/// Exact ISO-date match. The query date itself must be well-formed; stored
/// records are matched on their raw date strings.
pub fn filter_by_date(
    transactions: &[Transaction],
    date: &str,
) -> Result<Vec<Transaction>, LedgerError> {
    parse_date(date)?;
    let needle = date.trim();
    Ok(transactions
        .iter()
        .filter(|txn| txn.date.trim() == needle)
        .cloned()
        .collect())
}

/// Total expense amount per normalized category. Categories with no expense
/// activity are absent; income never contributes.
pub fn category_totals(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for txn in transactions {
        if txn.kind == EntryKind::Expense {
            *totals.entry(normalize_category(&txn.category)).or_insert(0.0) += txn.amount;
        }
    }
    totals
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

impl MonthlySummary {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    /// Display label, e.g. `"January 2023"`. Report ordering never relies
    /// on this string; month names do not sort chronologically.
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize - 1], self.year)
    }
}

/// Result of grouping the ledger by calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyReport {
    /// Chronological by `(year, month)`.
    pub months: Vec<MonthlySummary>,
    /// Raw date strings that could not be parsed and were excluded.
    pub skipped: Vec<String>,
}

/// Groups transactions by the calendar month of their date. Entries with
/// unparsable dates are excluded and reported in `skipped`.
pub fn monthly_totals(transactions: &[Transaction]) -> MonthlyReport {
    let mut buckets: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    let mut skipped = Vec::new();

    for txn in transactions {
        match parse_date(&txn.date) {
            Ok(date) => {
                let bucket = buckets.entry((date.year(), date.month())).or_insert((0.0, 0.0));
                match txn.kind {
                    EntryKind::Income => bucket.0 += txn.amount,
                    EntryKind::Expense => bucket.1 += txn.amount,
                }
            }
            Err(_) => {
                tracing::debug!(date = %txn.date, "skipping unparsable date in monthly report");
                skipped.push(txn.date.clone());
            }
        }
    }

    let months = buckets
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlySummary {
            year,
            month,
            income,
            expense,
        })
        .collect();

    MonthlyReport { months, skipped }
}

/// Income and expense totals over an arbitrary set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodSummary {
    pub income: f64,
    pub expense: f64,
}

impl PeriodSummary {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Sums transactions whose date falls in the calendar month of `today`.
/// Unparsable dates never belong to the current month.
pub fn current_month_summary(transactions: &[Transaction], today: NaiveDate) -> PeriodSummary {
    let mut summary = PeriodSummary::default();
    for txn in transactions {
        let in_month = txn
            .calendar_date()
            .map(|date| date.year() == today.year() && date.month() == today.month())
            .unwrap_or(false);
        if !in_month {
            continue;
        }
        match txn.kind {
            EntryKind::Income => summary.income += txn.amount,
            EntryKind::Expense => summary.expense += txn.amount,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(kind: EntryKind, amount: f64, category: &str, date: &str) -> Transaction {
        Transaction::new(kind, amount, category, "", date)
    }

    fn expense(amount: f64, category: &str, date: &str) -> Transaction {
        txn(EntryKind::Expense, amount, category, date)
    }

    fn income(amount: f64, category: &str, date: &str) -> Transaction {
        txn(EntryKind::Income, amount, category, date)
    }

    #[test]
    fn sort_by_amount_is_stable_for_ties() {
        let mut list = vec![
            expense(50.0, "A", "2025-01-01"),
            expense(50.0, "B", "2025-01-02"),
            expense(10.0, "C", "2025-01-03"),
        ];
        sort(&mut list, SortKey::AmountDesc);
        assert_eq!(list[0].category, "A");
        assert_eq!(list[1].category, "B");
        assert_eq!(list[2].category, "C");

        sort(&mut list, SortKey::AmountAsc);
        assert_eq!(list[0].category, "C");
        assert_eq!(list[1].category, "A");
        assert_eq!(list[2].category, "B");
    }

    #[test]
    fn sort_by_date_orders_iso_strings_chronologically() {
        let mut list = vec![
            expense(1.0, "A", "2025-02-10"),
            expense(2.0, "B", "2024-12-31"),
            expense(3.0, "C", "2025-01-01"),
        ];
        sort(&mut list, SortKey::DateAsc);
        let dates: Vec<&str> = list.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, ["2024-12-31", "2025-01-01", "2025-02-10"]);

        sort(&mut list, SortKey::DateDesc);
        assert_eq!(list[0].date, "2025-02-10");
    }

    #[test]
    fn unknown_sort_key_yields_none() {
        assert_eq!(SortKey::parse("by-vibes"), None);
        assert_eq!(SortKey::parse("amount-desc"), Some(SortKey::AmountDesc));
    }

    #[test]
    fn filter_by_category_matches_case_insensitively() {
        let list = vec![
            expense(10.0, " Food ", "2025-01-01"),
            expense(20.0, "Rent", "2025-01-02"),
        ];
        let matched = filter_by_category(&list, "food");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].amount, 10.0);
    }

    #[test]
    fn filter_with_no_matches_is_empty_not_an_error() {
        let list = vec![expense(10.0, "Food", "2025-01-01")];
        assert!(filter_by_category(&list, "Utilities").is_empty());
        assert!(filter_by_date(&list, "2025-06-01").unwrap().is_empty());
    }

    #[test]
    fn filter_by_date_rejects_malformed_query() {
        let list = vec![expense(10.0, "Food", "2025-01-01")];
        assert!(matches!(
            filter_by_date(&list, "01/01/2025"),
            Err(LedgerError::InvalidDate(_))
        ));
    }

    #[test]
    fn category_totals_sums_expenses_only() {
        let list = vec![
            expense(100.0, "food", "2025-01-01"),
            expense(50.0, " FOOD ", "2025-01-15"),
            income(900.0, "Food", "2025-01-20"),
            expense(75.0, "Rent", "2025-01-02"),
        ];
        let totals = category_totals(&list);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], 150.0);
        assert_eq!(totals["Rent"], 75.0);
    }

    #[test]
    fn category_totals_omits_income_only_categories() {
        let list = vec![income(900.0, "Salary", "2025-01-20")];
        assert!(category_totals(&list).is_empty());
    }

    #[test]
    fn monthly_totals_orders_by_year_month_not_label() {
        // Alphabetically "April 2023" < "January 2023" and
        // "January 2024" < "January 2023" would both be wrong.
        let list = vec![
            expense(3.0, "A", "2024-01-05"),
            income(1.0, "B", "2023-01-10"),
            expense(2.0, "C", "2023-04-20"),
        ];
        let report = monthly_totals(&list);
        let labels: Vec<String> = report.months.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["January 2023", "April 2023", "January 2024"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn monthly_totals_skips_and_reports_bad_dates() {
        let list = vec![
            expense(10.0, "A", "not-a-date"),
            income(500.0, "B", "2025-02-01"),
        ];
        let report = monthly_totals(&list);
        assert_eq!(report.months.len(), 1);
        assert_eq!(report.months[0].income, 500.0);
        assert_eq!(report.skipped, ["not-a-date"]);
    }

    #[test]
    fn monthly_summary_derives_balance() {
        let report = monthly_totals(&[
            income(1000.0, "Salary", "2025-03-01"),
            expense(350.0, "Food", "2025-03-10"),
        ]);
        assert_eq!(report.months[0].balance(), 650.0);
    }

    #[test]
    fn current_month_summary_restricts_to_calendar_month() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let list = vec![
            income(1000.0, "Salary", "2025-03-01"),
            expense(200.0, "Food", "2025-03-10"),
            expense(999.0, "Food", "2025-02-28"),
            expense(5.0, "Food", "garbled"),
        ];
        let summary = current_month_summary(&list, today);
        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expense, 200.0);
        assert_eq!(summary.balance(), 800.0);
    }
}
