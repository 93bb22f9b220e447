use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    errors::LedgerError,
    ledger::{Budgets, Transaction},
};

const DEFAULT_DIR_NAME: &str = ".expense_core";
const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const TRANSACTIONS_FILE: &str = "transactions.json";
const BUDGETS_FILE: &str = "budgets.json";
const TMP_SUFFIX: &str = "tmp";

/// How a document load was satisfied.
///
/// Missing and corrupt documents both recover to an empty container, but
/// callers can tell "empty because new" apart from "empty because the file
/// was unreadable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// File existed and parsed.
    Existing,
    /// File absent; fresh empty state.
    Missing,
    /// File present but unparsable; contents were ignored.
    Corrupt,
}

/// A loaded document together with its load outcome.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub status: DocumentStatus,
}

impl<T> Loaded<T> {
    /// True when the on-disk document was unreadable and the empty default
    /// was substituted.
    pub fn recovered(&self) -> bool {
        self.status == DocumentStatus::Corrupt
    }
}

/// Snapshot store: each save is an unconditional full rewrite of one file,
/// staged through a temporary sibling and atomically renamed into place.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens a store rooted at `root`, falling back to the `EXPENSE_CORE_HOME`
    /// environment override and then `~/.expense_core`.
    pub fn new(root: Option<PathBuf>) -> Result<Self, LedgerError> {
        let root = resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self, LedgerError> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.root.join(TRANSACTIONS_FILE)
    }

    pub fn budgets_path(&self) -> PathBuf {
        self.root.join(BUDGETS_FILE)
    }

    pub fn load_transactions(&self) -> Result<Loaded<Vec<Transaction>>, LedgerError> {
        self.load_document(&self.transactions_path())
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), LedgerError> {
        self.save_document(&self.transactions_path(), &transactions)?;
        tracing::debug!(count = transactions.len(), "saved transactions document");
        Ok(())
    }

    pub fn load_budgets(&self) -> Result<Loaded<Budgets>, LedgerError> {
        self.load_document(&self.budgets_path())
    }

    pub fn save_budgets(&self, budgets: &Budgets) -> Result<(), LedgerError> {
        self.save_document(&self.budgets_path(), budgets)?;
        tracing::debug!(count = budgets.len(), "saved budgets document");
        Ok(())
    }

    fn load_document<T>(&self, path: &Path) -> Result<Loaded<T>, LedgerError>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(Loaded {
                data: T::default(),
                status: DocumentStatus::Missing,
            });
        }
        let raw = fs::read_to_string(path)?;
        match serde_json::from_str(&raw) {
            Ok(data) => Ok(Loaded {
                data,
                status: DocumentStatus::Existing,
            }),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "document unparsable, recovering with empty state"
                );
                Ok(Loaded {
                    data: T::default(),
                    status: DocumentStatus::Corrupt,
                })
            }
        }
    }

    fn save_document<T>(&self, path: &Path, value: &T) -> Result<(), LedgerError>
    where
        T: Serialize + ?Sized,
    {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        let tmp = tmp_path(path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    if let Some(explicit) = root {
        return explicit;
    }
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn ensure_dir(path: &Path) -> Result<(), LedgerError> {
    fs::create_dir_all(path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
