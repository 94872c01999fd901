//! Expense store persisted to a JSON ledger file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{ExpenseStore, MemoryStore, Result, Session};
use crate::error::StoreError;
use crate::models::expense::{Expense, ExpenseUpdate, NewExpense};

/// Expense store that rewrites its ledger file after every change.
///
/// The file holds `{ "expenses": [...] }` for all users. Writes go to a
/// sibling `.tmp` file which is then renamed over the ledger. A change that
/// cannot be written is not kept in memory either.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the ledger at `path`. A missing file is an empty ledger.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?
        } else {
            debug!("No ledger at {}, starting empty", path.display());
            MemoryStore::new()
        };

        info!(
            "Opened ledger {} ({} records)",
            path.display(),
            inner.expenses().len()
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the records and keep it once saved.
    fn commit<T>(&mut self, change: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut next = self.inner.clone();
        let output = change(&mut next)?;
        self.persist(&next)?;
        self.inner = next;
        Ok(output)
    }

    fn persist(&self, records: &MemoryStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved ledger to {}", self.path.display());
        Ok(())
    }
}

impl ExpenseStore for JsonFileStore {
    fn list(&self, session: &Session) -> Result<Vec<Expense>> {
        self.inner.list(session)
    }

    fn get(&self, session: &Session, id: &str) -> Result<Expense> {
        self.inner.get(session, id)
    }

    fn create(&mut self, session: &Session, expense: NewExpense) -> Result<Expense> {
        self.commit(|records| records.create(session, expense))
    }

    fn update(&mut self, session: &Session, id: &str, update: ExpenseUpdate) -> Result<Expense> {
        self.commit(|records| records.update(session, id, update))
    }

    fn delete(&mut self, session: &Session, id: &str) -> Result<()> {
        self.commit(|records| records.delete(session, id))
    }
}
