//! Receipt total extraction.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use super::patterns::{AMOUNT_RULES, NUMBER_TOKEN};
use super::{ExtractionMatch, FieldExtractor};

/// Fallback pass only accepts totals strictly between these bounds.
pub const FALLBACK_MIN: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
pub const FALLBACK_MAX: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Receipt total extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First number anywhere in the receipt inside the plausible range.
    fn fallback(&self, lines: &[&str]) -> Option<ExtractionMatch<Decimal>> {
        for (index, line) in lines.iter().enumerate() {
            for token in NUMBER_TOKEN.find_iter(line) {
                let Some(value) = parse_amount_token(token.as_str()) else {
                    continue;
                };
                if value > FALLBACK_MIN && value < FALLBACK_MAX {
                    debug!("Amount from number fallback on line {}: {}", index, value);
                    return Some(ExtractionMatch::new(value, index, "any_number").as_fallback());
                }
            }
        }
        None
    }

    /// First rule on `line` whose capture parses to a positive amount.
    fn match_line(&self, index: usize, line: &str) -> Option<ExtractionMatch<Decimal>> {
        AMOUNT_RULES.iter().find_map(|rule| {
            let value = parse_amount_token(rule.capture(line)?)?;
            if value > Decimal::ZERO {
                debug!("Amount rule {} matched line {}: {}", rule.name, index, value);
                Some(ExtractionMatch::new(value, index, rule.name))
            } else {
                None
            }
        })
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, lines: &[&str]) -> Option<Self::Output> {
        lines
            .iter()
            .enumerate()
            .find_map(|(index, line)| self.match_line(index, line))
            .or_else(|| self.fallback(lines))
    }

    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| self.match_line(index, line))
            .collect()
    }
}

/// Parse a numeric token such as `"1,250.00"`, `"450"` or `"12."`.
///
/// Grouping commas are dropped. Returns `None` for tokens with no digits
/// or values that do not fit a [`Decimal`].
pub fn parse_amount_token(token: &str) -> Option<Decimal> {
    let cleaned: String = token.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim_end_matches('.');

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if cleaned.starts_with('.') {
        Decimal::from_str(&format!("0{}", cleaned)).ok()
    } else {
        Decimal::from_str(cleaned).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_token() {
        assert_eq!(parse_amount_token("1,250.00"), Some(dec("1250.00")));
        assert_eq!(parse_amount_token("1,00,000"), Some(dec("100000")));
        assert_eq!(parse_amount_token("12."), Some(dec("12")));
        assert_eq!(parse_amount_token(",.5"), Some(dec("0.5")));
        assert_eq!(parse_amount_token(","), None);
        assert_eq!(parse_amount_token(""), None);
        assert_eq!(parse_amount_token(&"9".repeat(60)), None);
    }

    #[test]
    fn test_rupee_total() {
        let found = AmountExtractor::new()
            .extract(&["Rice 50", "TOTAL: Rs. 1250.00"])
            .unwrap();

        assert_eq!(found.value, dec("1250.00"));
        assert_eq!(found.line, 1);
        assert_eq!(found.rule, "currency_or_label_prefix");
    }

    #[test]
    fn test_dollar_amount() {
        let found = AmountExtractor::new()
            .extract(&["Biryani x1 300", "$450"])
            .unwrap();

        assert_eq!(found.value, dec("450"));
        assert_eq!(found.rule, "dollar_prefix");
    }

    #[test]
    fn test_first_line_wins_over_later_totals() {
        let found = AmountExtractor::new()
            .extract(&["Paid ₹ 80", "TOTAL 500"])
            .unwrap();
        assert_eq!(found.value, dec("80"));
    }

    #[test]
    fn test_zero_capture_tries_next_rule() {
        // "INR 0" parses to zero, the trailing "25.00 Rs" still qualifies.
        let found = AmountExtractor::new().extract(&["INR 0 / 25.00 Rs"]).unwrap();
        assert_eq!(found.value, dec("25.00"));
        assert_eq!(found.rule, "decimal_before_marker");
    }

    #[test]
    fn test_number_fallback_range() {
        let extractor = AmountExtractor::new();

        let found = extractor.extract(&["Table 4", "Qty 10", "Paid 349.50"]).unwrap();
        assert_eq!(found.value, dec("349.50"));
        assert!(found.fallback);

        assert_eq!(extractor.extract(&["ref 100000", "x 7"]), None);
        assert_eq!(extractor.extract(&["no numbers here"]), None);
    }

    #[test]
    fn test_extract_all_lists_each_matching_line() {
        let all = AmountExtractor::new().extract_all(&["Rs 20", "Coke", "TOTAL 40"]);
        let values: Vec<_> = all.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![dec("20"), dec("40")]);
    }
}
