//! Ordered chain of OCR providers.

use tracing::{info, warn};

use super::TextRecognizer;
use crate::error::OcrError;

/// Text produced by the first provider that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognized {
    pub text: String,
    pub provider: String,
}

/// Tries each provider in turn until one returns non-blank text.
#[derive(Default)]
pub struct FallbackRecognizer {
    providers: Vec<Box<dyn TextRecognizer>>,
}

impl FallbackRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    pub fn with_provider(mut self, provider: impl TextRecognizer + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn TextRecognizer>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run the chain over an encoded image.
    pub async fn recognize(&self, image: &[u8]) -> Result<Recognized, OcrError> {
        if self.providers.is_empty() {
            return Err(OcrError::NoProviders);
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let result = provider
                .recognize(image)
                .await
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Err(OcrError::NoText)
                    } else {
                        Ok(text)
                    }
                });

            match result {
                Ok(text) => {
                    info!("OCR succeeded with {}", provider.name());
                    return Ok(Recognized {
                        text,
                        provider: provider.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!("OCR provider {} failed: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(OcrError::Exhausted(failures))
    }
}
