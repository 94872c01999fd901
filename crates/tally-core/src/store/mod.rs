//! Expense storage.
//!
//! Every operation is scoped to the user of a [`Session`]. Records owned by
//! another user behave as if they did not exist.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::expense::{Expense, ExpenseUpdate, NewExpense};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    /// Start a session; blank ids are not authenticated.
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(StoreError::Unauthenticated);
        }
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// CRUD over a user's expenses.
pub trait ExpenseStore {
    /// All of the user's expenses, newest date first.
    fn list(&self, session: &Session) -> Result<Vec<Expense>>;

    /// One expense by id.
    fn get(&self, session: &Session, id: &str) -> Result<Expense>;

    /// Validate and store a new expense.
    fn create(&mut self, session: &Session, expense: NewExpense) -> Result<Expense>;

    /// Apply a partial edit.
    fn update(&mut self, session: &Session, id: &str, update: ExpenseUpdate) -> Result<Expense>;

    /// Remove an expense.
    fn delete(&mut self, session: &Session, id: &str) -> Result<()>;
}

/// Order by date descending, most recently created first within a day.
///
/// The sort is stable, so callers pass records newest-inserted first to
/// break exact timestamp ties.
pub(crate) fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
