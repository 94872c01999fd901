//! Rule-based field extractors for receipt text.

pub mod amount;
pub mod items;
pub mod patterns;
pub mod store;

pub use amount::{parse_amount_token, AmountExtractor};
pub use items::ItemExtractor;
pub use patterns::{Rule, AMOUNT_RULES, ITEM_RULES, NOISE_LINE, NUMBER_TOKEN, STORE_RULES};
pub use store::StoreNameExtractor;

/// Trait for field extractors.
///
/// Extractors see the cleaned line sequence produced by [`clean_lines`].
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, applying fallbacks when no rule matches.
    fn extract(&self, lines: &[&str]) -> Option<Self::Output>;

    /// Every rule match in evaluation order, without fallbacks.
    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output>;
}

/// A value together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index into the cleaned line sequence.
    pub line: usize,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
    /// Whether a fallback pass produced the value.
    pub fallback: bool,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, rule: &'static str) -> Self {
        Self {
            value,
            line,
            rule,
            fallback: false,
        }
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }
}

/// Split on newlines, trim, and drop blank lines.
pub fn clean_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Keep ASCII letters, digits and spaces, then trim.
///
/// Other whitespace becomes a space so words stay separated.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    kept.trim().to_string()
}
