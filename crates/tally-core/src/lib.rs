//! Core library for tally, a receipt-scanning expense tracker.
//!
//! This crate provides:
//! - Receipt text parsing (store name, total amount, line items)
//! - Expense records with split-bill support
//! - Per-user expense storage (in memory or in a JSON ledger)
//! - Spending insights and money-saving suggestions
//! - OCR provider chain, with a local pure-Rust recognizer

pub mod error;
pub mod insights;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod store;

pub use error::{ExpenseError, OcrError, Result, StoreError, TallyError};
pub use insights::{SpendingInsights, Suggestion};
pub use models::{Category, Currency, Expense, ExpenseUpdate, NewExpense, ParsedReceipt, TallyConfig};
pub use ocr::{FallbackRecognizer, Recognized, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::LocalRecognizer;
pub use receipt::{parse_receipt, ReceiptParser};
pub use store::{ExpenseStore, JsonFileStore, MemoryStore, Session};
