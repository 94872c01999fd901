//! Structured fields guessed from receipt text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best-effort fields extracted from one block of OCR text.
///
/// Produced by [`crate::receipt::ReceiptParser`]. Absent fields are `None`
/// rather than sentinel values, so `amount` when present is always positive
/// and `store_name` always longer than two characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Merchant name: ASCII letters, digits and spaces only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    /// Receipt total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Purchased line items in receipt order, deduplicated.
    pub items: Vec<String>,

    /// The input text, verbatim.
    pub raw_text: String,
}

impl ParsedReceipt {
    /// A result with nothing extracted.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            store_name: None,
            amount: None,
            items: Vec::new(),
            raw_text: raw_text.into(),
        }
    }

    /// Whether any field was recognised.
    pub fn is_empty(&self) -> bool {
        self.store_name.is_none() && self.amount.is_none() && self.items.is_empty()
    }

    /// Human-readable list of fields the user still has to fill in.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_name.is_none() {
            missing.push("store name");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        missing
    }
}
