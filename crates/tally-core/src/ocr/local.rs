//! Local recognizer backed by `pure-onnx-ocr` (pure Rust, no ONNX Runtime).

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use image::GenericImageView;
use tracing::{debug, info};

use super::{boxes_to_text, sort_reading_order, TextBox, TextRecognizer};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Detection model file name inside the model directory.
pub const DET_MODEL: &str = "det.onnx";
/// Recognition model file name inside the model directory.
pub const REC_MODEL: &str = "latin_rec.onnx";
/// Character dictionary file name inside the model directory.
pub const DICTIONARY: &str = "latin_dict.txt";

/// Marker the recognizer emits for characters outside its dictionary.
const UNKNOWN_CHAR: &str = "[UNK]";

pub struct LocalRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl LocalRecognizer {
    /// Load the models from a directory.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join(DET_MODEL);
        let rec_path = model_dir.join(REC_MODEL);
        let dict_path = model_dir.join(DICTIONARY);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "{} not found",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded local OCR models from {}", model_dir.display());
        Ok(Self { engine })
    }

    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        Self::from_dir(&config.model_dir)
    }

    /// Recognize text regions in reading order.
    pub fn detect(&self, image: &[u8]) -> Result<Vec<TextBox>, OcrError> {
        let start = Instant::now();
        let image =
            image::load_from_memory(image).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        let (width, height) = image.dimensions();
        debug!("Recognizing {}x{} image", width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<TextBox> = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: r.text.replace(UNKNOWN_CHAR, " "),
            })
            .collect();
        sort_reading_order(&mut boxes);

        info!(
            "Local OCR found {} text regions in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );
        Ok(boxes)
    }
}

#[async_trait(?Send)]
impl TextRecognizer for LocalRecognizer {
    fn name(&self) -> &str {
        "local"
    }

    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let boxes = self.detect(image)?;
        Ok(boxes_to_text(&boxes))
    }
}

/// Take the first four exterior points of a polygon as a quadrilateral.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models_reported() {
        let dir = tempfile::tempdir().unwrap();

        match LocalRecognizer::from_dir(dir.path()) {
            Err(OcrError::ModelLoad(message)) => assert!(message.contains(DET_MODEL)),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("models should be missing"),
        }
    }
}
