//! Error types for the tally-core library.

use thiserror::Error;

/// Main error type for the tally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Expense storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Expense payload rejected.
    #[error("invalid expense: {0}")]
    Expense(#[from] ExpenseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by expense stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No authenticated user for the operation.
    #[error("not authenticated")]
    Unauthenticated,

    /// No expense with this id for the current user.
    #[error("expense not found: {0}")]
    NotFound(String),

    /// The payload failed validation.
    #[error(transparent)]
    Invalid(#[from] ExpenseError),

    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid ledger.
    #[error("corrupt ledger: {0}")]
    Corrupt(String),
}

/// Errors related to OCR providers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// A remote provider rejected the request.
    #[error("{provider}: {message}")]
    Provider { provider: String, message: String },

    /// The provider returned no text.
    #[error("no text detected")]
    NoText,

    /// No providers were configured.
    #[error("no OCR providers configured")]
    NoProviders,

    /// Every provider in the chain failed.
    #[error("all OCR providers failed: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

/// Errors related to expense payloads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpenseError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the tally library.
pub type Result<T> = std::result::Result<T, TallyError>;
