//! Merchant name extraction.

use tracing::debug;

use super::patterns::STORE_RULES;
use super::{normalize, ExtractionMatch, FieldExtractor};

/// Only the head of a receipt is searched for the merchant.
pub const STORE_SCAN_LINES: usize = 5;

/// Merchant name extractor.
pub struct StoreNameExtractor;

impl StoreNameExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First line of the receipt used as-is when no rule matched.
    fn fallback(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        let first = normalize(lines.first()?);
        let len = first.chars().count();
        if len > 3 && len < 50 {
            debug!("Store name from first-line fallback: {:?}", first);
            Some(ExtractionMatch::new(first, 0, "first_line").as_fallback())
        } else {
            None
        }
    }
}

impl Default for StoreNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StoreNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[&str]) -> Option<Self::Output> {
        // extract_all is line-major, so its head is the first accepted rule.
        self.extract_all(lines)
            .into_iter()
            .next()
            .or_else(|| self.fallback(lines))
    }

    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (index, line) in lines.iter().take(STORE_SCAN_LINES).enumerate() {
            for rule in STORE_RULES.iter() {
                let Some(captured) = rule.capture(line) else {
                    continue;
                };
                if captured.trim().chars().count() <= 2 {
                    continue;
                }

                let name = normalize(captured);
                if name.len() > 2 {
                    debug!("Store rule {} matched line {}: {:?}", rule.name, index, name);
                    results.push(ExtractionMatch::new(name, index, rule.name));
                    // Lower-priority rules on the same line are not consulted.
                    break;
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_chain() {
        let found = StoreNameExtractor::new()
            .extract(&["BIG BAZAAR", "Rice 50"])
            .unwrap();

        assert_eq!(found.value, "BIG BAZAAR");
        assert_eq!(found.rule, "retail_chain");
        assert!(!found.fallback);
    }

    #[test]
    fn test_venue_keyword_beats_capitalized_words() {
        let found = StoreNameExtractor::new()
            .extract(&["Green Leaf Restaurant"])
            .unwrap();

        assert_eq!(found.value, "Green Leaf");
        assert_eq!(found.rule, "venue_keyword");
    }

    #[test]
    fn test_short_capture_falls_through_to_next_rule() {
        // The venue keyword opens the line, leaving an empty capture.
        let found = StoreNameExtractor::new()
            .extract(&["Cafe Coffee Day"])
            .unwrap();
        assert_eq!(found.value, "Cafe Coffee");
        assert_eq!(found.rule, "capitalized_words");
    }

    #[test]
    fn test_symbols_stripped() {
        let found = StoreNameExtractor::new()
            .extract(&["Joe's Coffee Shop"])
            .unwrap();
        assert_eq!(found.value, "Joes Coffee");
    }

    #[test]
    fn test_only_first_five_lines_scanned() {
        let lines = ["12", "34", "56", "78", "90", "KFC"];
        let extractor = StoreNameExtractor::new();
        assert!(extractor.extract_all(&lines).is_empty());
        assert_eq!(extractor.extract(&lines), None);
    }

    #[test]
    fn test_first_line_fallback() {
        let found = StoreNameExtractor::new()
            .extract(&["#4471 shell fuel", "12.50"])
            .unwrap();

        assert_eq!(found.value, "4471 shell fuel");
        assert!(found.fallback);
    }

    #[test]
    fn test_fallback_length_bounds() {
        let extractor = StoreNameExtractor::new();
        assert_eq!(extractor.extract(&["ab1"]), None);
        assert_eq!(extractor.extract(&["z".repeat(50).as_str()]), None);
        assert!(extractor.extract(&["z".repeat(49).as_str()]).is_some());
        assert_eq!(extractor.extract(&[]), None);
    }
}
