//! WASM bindings for tally.
//!
//! Exposes receipt parsing, spending insights and amount formatting to
//! browsers and Node.js. OCR itself runs on the JavaScript side; its text or
//! text boxes are handed to this crate.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use tally_core::ocr::{boxes_to_text, sort_reading_order, TextBox};
use tally_core::{Category, Currency, Expense, NewExpense, ReceiptParser, SpendingInsights};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(date: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::from_str(date).map_err(|e| js_error(format!("invalid date {}: {}", date, e)))
}

/// Extract store name, amount and items from OCR text.
#[wasm_bindgen]
pub fn parse_receipt(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&tally_core::parse_receipt(text)).map_err(js_error)
}

/// Pre-fill an expense form from OCR text.
///
/// Fields the receipt did not reveal are left blank.
#[wasm_bindgen]
pub fn prefill_expense(text: &str, date: &str, currency: &str) -> Result<JsValue, JsValue> {
    let receipt = tally_core::parse_receipt(text);
    let currency = Currency::from_str(currency).map_err(js_error)?;
    let draft = NewExpense::from_receipt(&receipt, parse_date(date)?, currency);

    serde_wasm_bindgen::to_value(&draft).map_err(js_error)
}

/// Compute spending insights for a list of stored expenses as of `today`
/// (YYYY-MM-DD).
#[wasm_bindgen]
pub fn compute_insights(expenses: JsValue, today: &str) -> Result<JsValue, JsValue> {
    let expenses: Vec<Expense> = serde_wasm_bindgen::from_value(expenses).map_err(js_error)?;
    let insights = SpendingInsights::compute(&expenses, parse_date(today)?);

    serde_wasm_bindgen::to_value(&insights).map_err(js_error)
}

/// Receipt parser class for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptScanner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: ReceiptParser::new(),
        }
    }

    /// Limit how many line items are kept (at most 10).
    #[wasm_bindgen]
    pub fn set_max_items(&mut self, max_items: usize) {
        self.parser = ReceiptParser::new().with_max_items(max_items);
    }

    /// Parse OCR text.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.parser.parse(text)).map_err(js_error)
    }
}

impl Default for ReceiptScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Text boxes from browser-side OCR, assembled into receipt text.
#[wasm_bindgen]
pub struct OcrBoxes {
    boxes: Vec<TextBox>,
}

#[wasm_bindgen]
impl OcrBoxes {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Add a recognized text box.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
    ) {
        self.boxes.push(TextBox {
            bbox: [x1, y1, x2, y2, x3, y3, x4, y4],
            text: text.to_string(),
        });
    }

    /// Receipt text in reading order, one box per line.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        let mut boxes = self.boxes.clone();
        sort_reading_order(&mut boxes);
        boxes_to_text(&boxes)
    }

    /// Parse the assembled text.
    #[wasm_bindgen]
    pub fn parse_receipt(&self) -> Result<JsValue, JsValue> {
        parse_receipt(&self.get_text())
    }
}

impl Default for OcrBoxes {
    fn default() -> Self {
        Self::new()
    }
}

/// Formatting helpers for expense forms.
#[wasm_bindgen]
pub struct ExpenseUtils;

#[wasm_bindgen]
impl ExpenseUtils {
    /// Format an amount with its currency symbol ("₹1250.00", "$3.50").
    #[wasm_bindgen]
    pub fn format_amount(amount: &str, currency: &str) -> Result<String, JsValue> {
        let amount = Decimal::from_str(amount).map_err(js_error)?;
        let currency = Currency::from_str(currency).map_err(js_error)?;
        Ok(currency.format(amount))
    }

    /// Currency symbol for a code, or the code itself when unknown.
    #[wasm_bindgen]
    pub fn currency_symbol(currency: &str) -> String {
        Currency::from_str(currency)
            .map(|c| c.symbol().to_string())
            .unwrap_or_else(|_| currency.to_string())
    }

    /// Category labels in menu order.
    #[wasm_bindgen]
    pub fn categories() -> Vec<String> {
        Category::ALL.iter().map(|c| c.label().to_string()).collect()
    }

    /// One person's share of a split bill, rounded to cents. 0 people
    /// means a two-way split.
    #[wasm_bindgen]
    pub fn split_share(amount: &str, people: u32) -> Result<String, JsValue> {
        let amount = Decimal::from_str(amount).map_err(js_error)?;
        Ok(tally_core::models::expense::split_share(amount, people).to_string())
    }
}
