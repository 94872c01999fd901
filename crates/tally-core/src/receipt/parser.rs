//! Receipt parser combining the store, amount and item passes.

use tracing::debug;

use crate::models::receipt::ParsedReceipt;

use super::rules::{
    clean_lines, items::MAX_ITEMS, AmountExtractor, FieldExtractor, ItemExtractor,
    StoreNameExtractor,
};

/// Heuristic parser turning OCR text into [`ParsedReceipt`] fields.
///
/// Parsing is total and deterministic: every input, including the empty
/// string, produces a result, and the same input always produces the same
/// result. Fields the heuristics cannot find are left as `None`.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    /// Maximum number of line items kept.
    max_items: usize,
}

impl ReceiptParser {
    /// Create a parser with the default item cap.
    pub fn new() -> Self {
        Self {
            max_items: MAX_ITEMS,
        }
    }

    /// Lower the item cap. Values above [`MAX_ITEMS`] are clamped to it.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.min(MAX_ITEMS);
        self
    }

    /// Parse raw OCR text.
    pub fn parse(&self, text: &str) -> ParsedReceipt {
        let lines = clean_lines(text);
        if lines.is_empty() {
            return ParsedReceipt::empty(text);
        }

        let store_name = StoreNameExtractor::new().extract(&lines).map(|m| m.value);
        let amount = AmountExtractor::new().extract(&lines).map(|m| m.value);
        let items: Vec<String> = ItemExtractor::new()
            .with_max_items(self.max_items)
            .extract_all(&lines)
            .into_iter()
            .map(|m| m.value)
            .collect();

        debug!(
            "Parsed receipt: {} lines, store={:?}, amount={:?}, {} items",
            lines.len(),
            store_name,
            amount,
            items.len()
        );

        ParsedReceipt {
            store_name,
            amount,
            items,
            raw_text: text.to_string(),
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse raw OCR text with default settings.
pub fn parse_receipt(text: &str) -> ParsedReceipt {
    ReceiptParser::new().parse(text)
}
