//! In-memory expense store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{sort_newest_first, ExpenseStore, Result, Session};
use crate::error::StoreError;
use crate::models::expense::{Expense, ExpenseUpdate, NewExpense};

/// Expense store backed by a `Vec`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    expenses: Vec<Expense>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record, for every user.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    fn position(&self, session: &Session, id: &str) -> Result<usize> {
        self.expenses
            .iter()
            .position(|e| e.id == id && e.user_id == session.user_id())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl ExpenseStore for MemoryStore {
    fn list(&self, session: &Session) -> Result<Vec<Expense>> {
        let mut owned: Vec<Expense> = self
            .expenses
            .iter()
            .rev()
            .filter(|e| e.user_id == session.user_id())
            .cloned()
            .collect();
        sort_newest_first(&mut owned);
        Ok(owned)
    }

    fn get(&self, session: &Session, id: &str) -> Result<Expense> {
        let index = self.position(session, id)?;
        Ok(self.expenses[index].clone())
    }

    fn create(&mut self, session: &Session, expense: NewExpense) -> Result<Expense> {
        let expense = expense.into_expense(
            Uuid::new_v4().to_string(),
            session.user_id().to_string(),
            Utc::now(),
        )?;

        debug!("Created expense {} for {}", expense.id, session.user_id());
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    fn update(&mut self, session: &Session, id: &str, update: ExpenseUpdate) -> Result<Expense> {
        let index = self.position(session, id)?;
        let expense = &mut self.expenses[index];
        update.apply(expense, Utc::now())?;

        debug!("Updated expense {}", id);
        Ok(expense.clone())
    }

    fn delete(&mut self, session: &Session, id: &str) -> Result<()> {
        let index = self.position(session, id)?;
        self.expenses.remove(index);

        debug!("Deleted expense {}", id);
        Ok(())
    }
}
