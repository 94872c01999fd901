//! Line item extraction.

use tracing::debug;

use super::patterns::{ITEM_RULES, NOISE_LINE};
use super::{normalize, ExtractionMatch, FieldExtractor};

/// Cap on the number of items kept per receipt.
pub const MAX_ITEMS: usize = 10;

/// Line item extractor.
pub struct ItemExtractor {
    max_items: usize,
}

impl ItemExtractor {
    pub fn new() -> Self {
        Self {
            max_items: MAX_ITEMS,
        }
    }

    /// Lower the number of items collected; never above [`MAX_ITEMS`].
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.min(MAX_ITEMS);
        self
    }

    /// Item text for a single line, if the line looks like an item.
    fn match_line(&self, index: usize, line: &str) -> Option<ExtractionMatch<String>> {
        if NOISE_LINE.is_match(line) {
            return None;
        }

        ITEM_RULES.iter().find_map(|rule| {
            let item = normalize(rule.capture(line)?);
            if item.len() > 2 {
                Some(ExtractionMatch::new(item, index, rule.name))
            } else {
                None
            }
        })
    }
}

impl Default for ItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ItemExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[&str]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output> {
        let mut results: Vec<ExtractionMatch<String>> = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            if results.len() >= self.max_items {
                break;
            }

            let Some(found) = self.match_line(index, line) else {
                continue;
            };

            if results.iter().any(|r| r.value == found.value) {
                debug!("Skipping duplicate item {:?} on line {}", found.value, index);
                continue;
            }

            debug!("Item rule {} matched line {}: {:?}", found.rule, index, found.value);
            results.push(found);
        }

        results
    }
}
