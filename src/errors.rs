use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common ledger failures.
///
/// Every validation variant is recoverable: the shell reports the message
/// and the user re-enters input. Only real I/O trouble is ever fatal.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid amount `{0}`: expected a positive number")]
    InvalidAmount(String),
    #[error("invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("no transaction at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown transaction {0}")]
    UnknownTransaction(Uuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
