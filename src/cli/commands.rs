//! Command implementations and dispatch for the interactive shell.

use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use thiserror::Error;

use crate::{
    errors::LedgerError,
    ledger::{normalize_category, parse_amount, Budgets, EntryKind, Transaction},
    reports::{
        self,
        alerts::{evaluate_budget, BudgetStatus},
        SortKey,
    },
    storage::{JsonStore, Loaded},
};

use super::format::format_amount;
use super::output;
use super::table::{Table, TableColumn};

/// Registered commands with their help descriptions.
pub const COMMANDS: &[(&str, &str)] = &[
    ("add", "Record an income or expense"),
    ("list", "List transactions, optionally sorted"),
    ("summary", "Income, expense and balance for the current month"),
    ("monthly", "Month-by-month income/expense summary"),
    ("categories", "Spending totals per category"),
    ("filter", "Filter transactions by category or date"),
    ("edit", "Edit a transaction by row number"),
    ("delete", "Delete a transaction by row number"),
    ("budget", "Set the monthly budget for a category"),
    ("budgets", "List configured budgets"),
    ("help", "Show available commands"),
    ("exit", "Quit the tracker"),
];

const SUGGESTION_DISTANCE: usize = 2;

/// Error raised by a single command; the shell reports it and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("input error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Shared state for one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub store: JsonStore,
    theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, LedgerError> {
        Ok(Self {
            mode,
            store: JsonStore::new_default()?,
            theme: ColorfulTheme::default(),
        })
    }

    pub fn with_store(mode: CliMode, store: JsonStore) -> Self {
        Self {
            mode,
            store,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn command_names() -> Vec<&'static str> {
        COMMANDS.iter().map(|(name, _)| *name).collect()
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        match command {
            "add" => self.add(args)?,
            "list" => self.list(args)?,
            "summary" => self.summary()?,
            "monthly" => self.monthly()?,
            "categories" => self.categories()?,
            "filter" => self.filter(args)?,
            "edit" => self.edit(args)?,
            "delete" => self.delete(args)?,
            "budget" => self.set_budget(args)?,
            "budgets" => self.list_budgets()?,
            "help" => self.help(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => self.unknown(other),
        }
        Ok(LoopControl::Continue)
    }

    fn add(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let kind = match args.first() {
            Some(raw) => EntryKind::parse(raw).ok_or_else(|| {
                CommandError::Usage(format!("unknown transaction type `{raw}` (income/expense)"))
            })?,
            None => self.prompt_kind()?,
        };
        let amount = parse_amount(&self.arg_or_prompt(args, 1, "Amount")?)?;
        let category_prompt = match kind {
            EntryKind::Expense => "Category (e.g. Food, Rent)",
            EntryKind::Income => "Income source (e.g. Salary, Freelance)",
        };
        let category = self.arg_or_prompt(args, 2, category_prompt)?;
        let description = self.arg_or_prompt(args, 3, "Description")?;
        let date = self.arg_or_prompt(args, 4, "Date (YYYY-MM-DD)")?;

        let mut transactions = self.load_transactions_reporting()?.data;

        // The category is captured above, and the check runs against the
        // ledger before the new entry is appended: the alert reflects
        // pre-insertion spend for the month (check-before-commit).
        if kind == EntryKind::Expense {
            let budgets = self.load_budgets_reporting()?.data;
            let today = Local::now().date_naive();
            let eval = evaluate_budget(&transactions, &budgets, &category, today);
            if let Some(limit) = eval.limit {
                let name = normalize_category(&category);
                match eval.status {
                    BudgetStatus::Exceeded => output::warning(format!(
                        "ALERT: you have exceeded your {} budget for {} (spent {} this month).",
                        format_amount(limit),
                        name,
                        format_amount(eval.spent)
                    )),
                    BudgetStatus::Warning => output::warning(format!(
                        "you are nearing your {} budget for {} (spent {} this month).",
                        format_amount(limit),
                        name,
                        format_amount(eval.spent)
                    )),
                    BudgetStatus::Ok => {}
                }
            }
        }

        transactions.push(Transaction::new(kind, amount, category, description, date));
        self.store.save_transactions(&transactions)?;
        output::success("Transaction added.");
        Ok(())
    }

    fn list(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let mut transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions found.");
            return Ok(());
        }
        let key = match args.first() {
            Some(raw) => {
                let parsed = SortKey::parse(raw);
                if parsed.is_none() {
                    output::warning(format!("Unknown sort key `{raw}`. Showing default order."));
                }
                parsed
            }
            None if self.mode == CliMode::Interactive => self.prompt_sort_key()?,
            None => None,
        };
        if let Some(key) = key {
            reports::sort(&mut transactions, key);
        }
        output::section("Transactions");
        render_transactions(&transactions);
        Ok(())
    }

    fn summary(&mut self) -> Result<(), CommandError> {
        let transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions available.");
            return Ok(());
        }
        let now = Local::now();
        let summary = reports::current_month_summary(&transactions, now.date_naive());
        output::section(format!("Summary for {}", now.format("%B %Y")));
        output::info(format!("Total Income:  {}", format_amount(summary.income)));
        output::info(format!("Total Expense: {}", format_amount(summary.expense)));
        output::info(format!("Balance:       {}", format_amount(summary.balance())));
        Ok(())
    }

    fn monthly(&mut self) -> Result<(), CommandError> {
        let transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions to summarize.");
            return Ok(());
        }
        let report = reports::monthly_totals(&transactions);
        for date in &report.skipped {
            output::warning(format!("Skipping invalid date: {date}"));
        }
        if report.months.is_empty() {
            output::info("No valid monthly data found.");
            return Ok(());
        }
        output::section("Monthly Summary");
        let mut table = Table::new(vec![
            TableColumn::left("Month"),
            TableColumn::right("Income"),
            TableColumn::right("Expense"),
            TableColumn::right("Balance"),
        ]);
        for month in &report.months {
            table.push_row(vec![
                month.label(),
                format_amount(month.income),
                format_amount(month.expense),
                format_amount(month.balance()),
            ]);
        }
        output::info(table.render());
        Ok(())
    }

    fn categories(&mut self) -> Result<(), CommandError> {
        let transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions available for analysis.");
            return Ok(());
        }
        let totals = reports::category_totals(&transactions);
        if totals.is_empty() {
            output::info("No expense data available.");
            return Ok(());
        }
        output::section("Category Spending");
        let mut table = Table::new(vec![
            TableColumn::left("Category"),
            TableColumn::right("Total Spent"),
        ]);
        for (category, total) in &totals {
            table.push_row(vec![category.clone(), format_amount(*total)]);
        }
        output::info(table.render());
        Ok(())
    }

    fn filter(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let mode = match args.first() {
            Some(raw) => raw.to_lowercase(),
            None if self.mode == CliMode::Interactive => {
                let items = ["Category", "Date"];
                let choice = Select::with_theme(&self.theme)
                    .with_prompt("Filter by")
                    .items(&items)
                    .default(0)
                    .interact()?;
                items[choice].to_lowercase()
            }
            None => {
                return Err(CommandError::Usage(
                    "usage: filter <category|date> <value>".into(),
                ))
            }
        };
        let transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions to filter.");
            return Ok(());
        }
        match mode.as_str() {
            "category" => {
                let needle = if args.len() > 1 {
                    args[1..].join(" ")
                } else {
                    self.arg_or_prompt(args, 1, "Category to filter (e.g. Food, Rent)")?
                };
                let matched = reports::filter_by_category(&transactions, &needle);
                if matched.is_empty() {
                    output::info(format!(
                        "No transactions found in category: {}",
                        normalize_category(&needle)
                    ));
                } else {
                    output::section("Filtered Transactions");
                    render_transactions(&matched);
                }
            }
            "date" => {
                let date = self.arg_or_prompt(args, 1, "Date to filter (YYYY-MM-DD)")?;
                let matched = reports::filter_by_date(&transactions, &date)?;
                if matched.is_empty() {
                    output::info(format!("No transactions found for {}.", date.trim()));
                } else {
                    output::section("Filtered Transactions");
                    render_transactions(&matched);
                }
            }
            other => {
                return Err(CommandError::Usage(format!(
                    "unknown filter `{other}` (category/date)"
                )))
            }
        }
        Ok(())
    }

    fn delete(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let mut transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions to delete.");
            return Ok(());
        }
        if self.mode == CliMode::Interactive && args.is_empty() {
            render_transactions(&transactions);
        }
        let pos = self.resolve_row(&transactions, args, "Transaction number to delete")?;
        // Row numbers are only valid against the listing just produced;
        // resolve to the stable identifier before touching the list.
        let id = transactions[pos].id;
        if self.mode == CliMode::Interactive {
            let confirmed = Confirm::with_theme(&self.theme)
                .with_prompt(format!("Delete transaction #{}?", pos + 1))
                .default(false)
                .interact()?;
            if !confirmed {
                output::info("Cancelled.");
                return Ok(());
            }
        }
        let index = transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(LedgerError::UnknownTransaction(id))?;
        let removed = transactions.remove(index);
        self.store.save_transactions(&transactions)?;
        output::success(format!(
            "Deleted {} of {} ({}).",
            removed.kind.label().to_lowercase(),
            format_amount(removed.amount),
            removed.category
        ));
        Ok(())
    }

    fn edit(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let mut transactions = self.load_transactions_reporting()?.data;
        if transactions.is_empty() {
            output::info("No transactions to edit.");
            return Ok(());
        }
        if self.mode == CliMode::Interactive && args.is_empty() {
            render_transactions(&transactions);
        }
        let pos = self.resolve_row(&transactions, args, "Transaction number to edit")?;
        let id = transactions[pos].id;
        let current = transactions[pos].clone();

        if self.mode == CliMode::Interactive {
            output::info("Leave a field blank (or pass `-`) to keep the current value.");
        }
        let kind = match self.edit_field(args, 1, &format!("Type [{}]", current.kind.label()))? {
            Some(raw) => EntryKind::parse(&raw).ok_or_else(|| {
                CommandError::Usage(format!("unknown transaction type `{raw}` (income/expense)"))
            })?,
            None => current.kind,
        };
        let amount = match self.edit_field(args, 2, &format!("Amount [{}]", current.amount))? {
            Some(raw) => parse_amount(&raw)?,
            None => current.amount,
        };
        let category = self
            .edit_field(args, 3, &format!("Category [{}]", current.category))?
            .unwrap_or_else(|| current.category.clone());
        let description = self
            .edit_field(args, 4, &format!("Description [{}]", current.description))?
            .unwrap_or_else(|| current.description.clone());
        let date = self
            .edit_field(args, 5, &format!("Date [{}]", current.date))?
            .unwrap_or_else(|| current.date.clone());

        let index = transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(LedgerError::UnknownTransaction(id))?;
        transactions[index] = Transaction {
            id,
            kind,
            amount,
            category,
            description,
            date,
        };
        self.store.save_transactions(&transactions)?;
        output::success("Transaction updated.");
        Ok(())
    }

    fn set_budget(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let (category, limit_raw) = match args.len() {
            0 => (
                self.arg_or_prompt(args, 0, "Category to budget (e.g. Food, Rent)")?,
                self.arg_or_prompt(args, 1, "Monthly budget amount")?,
            ),
            1 => (
                args[0].to_string(),
                self.arg_or_prompt(args, 1, "Monthly budget amount")?,
            ),
            n => (args[..n - 1].join(" "), args[n - 1].to_string()),
        };
        let limit = parse_amount(&limit_raw)?;
        let mut budgets = self.load_budgets_reporting()?.data;
        let name = budgets.set(&category, limit)?;
        self.store.save_budgets(&budgets)?;
        output::success(format!(
            "Budget for {} set to {}.",
            name,
            format_amount(limit)
        ));
        Ok(())
    }

    fn list_budgets(&mut self) -> Result<(), CommandError> {
        let budgets = self.load_budgets_reporting()?.data;
        if budgets.is_empty() {
            output::info("No budgets configured.");
            return Ok(());
        }
        output::section("Monthly Budgets");
        let mut table = Table::new(vec![
            TableColumn::left("Category"),
            TableColumn::right("Monthly Limit"),
        ]);
        for (category, limit) in budgets.iter() {
            table.push_row(vec![category.to_string(), format_amount(limit)]);
        }
        output::info(table.render());
        Ok(())
    }

    fn help(&self) {
        output::section("Commands");
        let width = COMMANDS
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        for (name, description) in COMMANDS {
            output::info(format!("  {:<width$}  {}", name, description));
        }
    }

    fn unknown(&self, command: &str) {
        let suggestion = COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .min_by_key(|name| strsim::levenshtein(command, name))
            .filter(|name| strsim::levenshtein(command, name) <= SUGGESTION_DISTANCE);
        match suggestion {
            Some(name) => output::warning(format!(
                "Unknown command `{command}`. Did you mean `{name}`?"
            )),
            None => output::warning(format!(
                "Unknown command `{command}`. Type `help` for the list."
            )),
        }
    }

    fn prompt_kind(&self) -> Result<EntryKind, CommandError> {
        if self.mode == CliMode::Script {
            return Err(CommandError::Usage(
                "usage: add <income|expense> <amount> <category> <description> <date>".into(),
            ));
        }
        let items = ["Expense", "Income"];
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Transaction type")
            .items(&items)
            .default(0)
            .interact()?;
        Ok(if choice == 0 {
            EntryKind::Expense
        } else {
            EntryKind::Income
        })
    }

    fn prompt_sort_key(&self) -> Result<Option<SortKey>, CommandError> {
        const KEYS: [SortKey; 4] = [
            SortKey::DateDesc,
            SortKey::DateAsc,
            SortKey::AmountDesc,
            SortKey::AmountAsc,
        ];
        let mut items: Vec<&str> = KEYS.iter().map(SortKey::describe).collect();
        items.push("Default order");
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Sort by")
            .items(&items)
            .default(0)
            .interact()?;
        Ok(KEYS.get(choice).copied())
    }

    fn arg_or_prompt(&self, args: &[&str], idx: usize, prompt: &str) -> Result<String, CommandError> {
        if let Some(value) = args.get(idx) {
            return Ok((*value).to_string());
        }
        if self.mode == CliMode::Script {
            return Err(CommandError::Usage(format!("missing argument: {prompt}")));
        }
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()?)
    }

    /// Optional field for `edit`: inline `-` or an absent/blank value keeps
    /// the current one.
    fn edit_field(
        &self,
        args: &[&str],
        idx: usize,
        prompt: &str,
    ) -> Result<Option<String>, CommandError> {
        if let Some(raw) = args.get(idx) {
            return Ok(if *raw == "-" {
                None
            } else {
                Some((*raw).to_string())
            });
        }
        if self.mode == CliMode::Script {
            return Ok(None);
        }
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(if value.trim().is_empty() {
            None
        } else {
            Some(value)
        })
    }

    fn resolve_row(
        &self,
        transactions: &[Transaction],
        args: &[&str],
        prompt: &str,
    ) -> Result<usize, CommandError> {
        let raw = self.arg_or_prompt(args, 0, prompt)?;
        let number: usize = raw
            .trim()
            .parse()
            .map_err(|_| CommandError::Usage(format!("`{}` is not a row number", raw.trim())))?;
        if number == 0 || number > transactions.len() {
            return Err(LedgerError::IndexOutOfRange {
                index: number,
                len: transactions.len(),
            }
            .into());
        }
        Ok(number - 1)
    }

    fn load_transactions_reporting(&self) -> Result<Loaded<Vec<Transaction>>, CommandError> {
        let loaded = self.store.load_transactions()?;
        if loaded.recovered() {
            output::warning("Transactions document was unreadable; starting from an empty list.");
        }
        Ok(loaded)
    }

    fn load_budgets_reporting(&self) -> Result<Loaded<Budgets>, CommandError> {
        let loaded = self.store.load_budgets()?;
        if loaded.recovered() {
            output::warning("Budgets document was unreadable; starting from an empty mapping.");
        }
        Ok(loaded)
    }
}


/// Renders the standard numbered transaction table. Row numbers start at 1
/// and are only stable until the next listing.
fn render_transactions(transactions: &[Transaction]) {
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::right("Amount"),
        TableColumn::left("Category"),
        TableColumn::left("Description"),
    ]);
    for (index, txn) in transactions.iter().enumerate() {
        table.push_row(vec![
            (index + 1).to_string(),
            txn.date.clone(),
            txn.kind.label().to_string(),
            format_amount(txn.amount),
            txn.category.clone(),
            txn.description.clone(),
        ]);
    }
    output::info(table.render());
}
