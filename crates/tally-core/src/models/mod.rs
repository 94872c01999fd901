//! Data models for tally.

pub mod config;
pub mod expense;
pub mod receipt;

pub use config::TallyConfig;
pub use expense::{Category, Currency, Expense, ExpenseUpdate, NewExpense};
pub use receipt::ParsedReceipt;
