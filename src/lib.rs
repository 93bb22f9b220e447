//! Expense Core is a small personal finance ledger: income and expense
//! records persisted as whole-file JSON snapshots, with monthly reports,
//! category spending analysis, and per-category budget alerts on top.

pub mod cli;
pub mod errors;
pub mod ledger;
pub mod reports;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::from_default_env().add_directive("expense_core=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}
