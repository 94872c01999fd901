//! OCR providers that turn a receipt photo into raw text.

mod fallback;
#[cfg(feature = "native")]
mod local;

pub use fallback::{FallbackRecognizer, Recognized};
#[cfg(feature = "native")]
pub use local::LocalRecognizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A source of OCR text.
///
/// Futures are not required to be `Send`; recognizers are driven from a
/// single task.
#[async_trait(?Send)]
pub trait TextRecognizer {
    /// Short provider name used in logs and results.
    fn name(&self) -> &str;

    /// Recognize the text in an encoded image (PNG, JPEG, ...).
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// A recognized text region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    pub bbox: [f32; 8],

    pub text: String,
}

impl TextBox {
    /// Axis-aligned bounding rectangle `(min_x, min_y, max_x, max_y)`.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Height in pixels of the bands boxes are grouped into when ordering.
const ROW_HEIGHT: f32 = 20.0;

/// Sort boxes top-to-bottom, then left-to-right within a row.
pub fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();
        let row_a = (ay / ROW_HEIGHT) as i32;
        let row_b = (by / ROW_HEIGHT) as i32;

        row_a
            .cmp(&row_b)
            .then_with(|| ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
    });
}

/// Join boxes into receipt text, one box per line.
pub fn boxes_to_text(boxes: &[TextBox]) -> String {
    boxes
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 12.0, x, y + 12.0],
            text: text.to_string(),
        }
    }

    #[test]
    fn test_reading_order() {
        let mut boxes = vec![
            text_box("1250.00", 200.0, 83.0),
            text_box("BIG BAZAAR", 10.0, 5.0),
            text_box("TOTAL", 10.0, 85.0),
            text_box("Rice", 10.0, 40.0),
        ];

        sort_reading_order(&mut boxes);
        assert_eq!(boxes_to_text(&boxes), "BIG BAZAAR\nRice\nTOTAL\n1250.00");
    }

    #[test]
    fn test_rect() {
        let b = text_box("x", 4.0, 8.0);
        assert_eq!(b.rect(), (4.0, 8.0, 54.0, 20.0));
    }
}
