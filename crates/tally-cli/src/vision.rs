//! Cloud vision OCR provider.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_core::models::config::OcrConfig;
use tally_core::{OcrError, TextRecognizer};

const PROVIDER: &str = "vision";

/// Sends images to a vision `images:annotate` endpoint.
pub struct VisionRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    image: ImageContent,
    features: &'a [Feature],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

static FEATURES: [Feature; 2] = [
    Feature {
        kind: "TEXT_DETECTION",
    },
    Feature {
        kind: "DOCUMENT_TEXT_DETECTION",
    },
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiError,
}

impl VisionRecognizer {
    /// Build from config; `None` when no API key is configured.
    pub fn from_config(config: &OcrConfig) -> Result<Option<Self>, OcrError> {
        let Some(api_key) = config.vision_api_key.clone().filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(provider_error)?;

        Ok(Some(Self {
            client,
            endpoint: config.vision_endpoint.clone(),
            api_key,
        }))
    }
}

#[async_trait(?Send)]
impl TextRecognizer for VisionRecognizer {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: &FEATURES,
            }],
        };

        debug!("Posting {} byte image to {}", image.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(provider_error)?;

        let status = response.status();
        let payload = response.text().await.map_err(provider_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&payload)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OcrError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), message),
            });
        }

        let parsed: AnnotateResponse = serde_json::from_str(&payload).map_err(provider_error)?;
        extract_text(parsed)
    }
}

fn extract_text(response: AnnotateResponse) -> Result<String, OcrError> {
    let first = response.responses.into_iter().next().unwrap_or_default();

    match (first.full_text_annotation, first.error) {
        (Some(annotation), _) if !annotation.text.trim().is_empty() => Ok(annotation.text),
        (_, Some(error)) => Err(OcrError::Provider {
            provider: PROVIDER.to_string(),
            message: error.message,
        }),
        _ => Err(OcrError::NoText),
    }
}

fn provider_error(e: impl std::fmt::Display) -> OcrError {
    OcrError::Provider {
        provider: PROVIDER.to_string(),
        message: e.to_string(),
    }
}
