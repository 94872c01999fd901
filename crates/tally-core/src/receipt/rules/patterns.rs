//! Ordered regex tables for receipt extraction.
//!
//! Each table is evaluated top to bottom and the first rule that yields an
//! acceptable value wins. Reordering entries changes parser output.

use lazy_static::lazy_static;
use regex::Regex;

/// A named pattern whose first capture group holds the candidate value.
#[derive(Debug)]
pub struct Rule {
    /// Stable name, used in logs and [`super::ExtractionMatch::rule`].
    pub name: &'static str,
    /// Pattern applied to a single cleaned line.
    pub pattern: Regex,
}

impl Rule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            // Patterns are compile-time literals covered by tests.
            pattern: Regex::new(pattern).expect("invalid built-in receipt pattern"),
        }
    }

    /// First capture group of the first match on `line`.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

lazy_static! {
    /// Merchant name rules, highest priority first.
    pub static ref STORE_RULES: Vec<Rule> = vec![
        // Text before a venue keyword: "Fresh Mart Store", "Blue Tokai Cafe"
        Rule::new(
            "venue_keyword",
            r"(?i)^(.*?)(?:store|shop|market|mall|restaurant|cafe|hotel)",
        ),
        // Leading capitalised words: "Swiggy Order"
        Rule::new("capitalized_words", r"^([A-Z][a-z]+\s*[A-Z]*[a-z]*)\s"),
        // Large retail chains
        Rule::new(
            "retail_chain",
            r"(?i)^(BIG\s*BAZAAR|RELIANCE|MORE|DMART|SPENCER|LIFESTYLE|WESTSIDE|PANTALOONS)",
        ),
        // Food delivery and restaurant brands
        Rule::new(
            "food_brand",
            r"(?i)^(SWIGGY|ZOMATO|UBER\s*EATS|DOMINOS|PIZZA\s*HUT|KFC|MCDONALD)",
        ),
    ];

    /// Receipt total rules, highest priority first.
    pub static ref AMOUNT_RULES: Vec<Rule> = vec![
        Rule::new(
            "currency_or_label_prefix",
            r"(?i)(?:₹|Rs\.?|INR|TOTAL|AMOUNT)\s*:?\s*([0-9,]+\.?[0-9]*)",
        ),
        Rule::new("total_label", r"(?i)TOTAL\s*:?\s*([0-9,]+\.?[0-9]*)"),
        Rule::new("dollar_prefix", r"\$\s*([0-9,]+\.?[0-9]*)"),
        Rule::new(
            "decimal_before_marker",
            r"(?i)([0-9,]+\.[0-9]{2})\s*(?:₹|Rs|INR|TOTAL)",
        ),
        Rule::new("integer_before_marker", r"(?i)([0-9,]+)\s*(?:₹|Rs|INR)"),
    ];

    /// Line item rules, highest priority first.
    pub static ref ITEM_RULES: Vec<Rule> = vec![
        // "1. Rice 50"
        Rule::new("numbered", r"^\d+\.\s*(.+?)\s+[₹$Rs]?[0-9,]+"),
        // "Biryani x1 300"
        Rule::new("quantity_marker", r"^(.+?)\s+(?:x\d+)?\s+[₹$Rs]?[0-9,]+"),
        // "Dal 40"
        Rule::new("trailing_price", r"^(.+?)\s+[₹$Rs]?[0-9,]+\.?[0-9]*$"),
    ];

    /// Any numeric token, grouping commas allowed.
    pub static ref NUMBER_TOKEN: Regex = Regex::new(r"([0-9,]+\.?[0-9]*)")
        .expect("invalid built-in receipt pattern");

    /// Lines that are never line items (totals, taxes, contact details, footers).
    pub static ref NOISE_LINE: Regex = Regex::new(
        r"(?i)total|amount|₹|tax|cgst|sgst|discount|phone|address|thank|visit"
    ).expect("invalid built-in receipt pattern");
}
