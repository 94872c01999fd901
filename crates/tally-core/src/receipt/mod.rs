//! Receipt text extraction.
//!
//! Turns the raw text produced by an OCR provider into a best-guess store
//! name, total and item list. Each field has its own ordered rule table in
//! [`rules::patterns`]; the first rule that yields an acceptable value wins.

mod parser;
pub mod rules;

pub use parser::{parse_receipt, ReceiptParser};
pub use rules::{ExtractionMatch, FieldExtractor};
