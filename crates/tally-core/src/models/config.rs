//! Configuration structures for tally.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TallyError;
use crate::models::expense::Currency;

/// Main configuration for tally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Identity used to scope expense records.
    pub user: UserConfig,

    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Expense ledger location.
    pub storage: StorageConfig,

    /// Display preferences.
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// User id attached to every record.
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
        }
    }
}

/// Available OCR providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrProviderKind {
    /// Cloud vision API, needs `vision_api_key`.
    Vision,
    /// Local pure-Rust recognizer, needs models in `model_dir`.
    Local,
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Providers to try, in order.
    pub providers: Vec<OcrProviderKind>,

    /// API key for the cloud vision provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_api_key: Option<String>,

    /// Annotate endpoint of the cloud vision provider.
    pub vision_endpoint: String,

    /// Request timeout for remote providers, in seconds.
    pub timeout_secs: u64,

    /// Directory containing `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub model_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            providers: vec![OcrProviderKind::Vision, OcrProviderKind::Local],
            vision_api_key: None,
            vision_endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            timeout_secs: 30,
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of line items kept from a receipt.
    pub max_items: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_items: crate::receipt::rules::items::MAX_ITEMS,
        }
    }
}

/// Expense ledger location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Ledger file; the platform data directory is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Display preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency for new expenses when none is given.
    pub currency: Currency,
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, TallyError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TallyError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), TallyError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| TallyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
