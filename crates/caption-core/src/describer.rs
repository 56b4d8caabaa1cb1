//! Image description for caption context.
//!
//! Reads one image, sends it inline as a JPEG data URL with a fixed
//! instruction, and returns a short human-sounding description.

use crate::error::{CaptionError, Result};
use crate::llm::{ImageInput, LlmProvider, VisionRequest};
use crate::prompt::DESCRIBE_IMAGE_PROMPT;
use std::path::Path;
use std::sync::Arc;

/// Output token budget used when the caller has no opinion.
pub const DEFAULT_DESCRIPTION_MAX_TOKENS: u32 = 100;

/// Sampling temperature for descriptions.
pub const DEFAULT_DESCRIPTION_TEMPERATURE: f32 = 0.7;

/// Returned when the model answers with nothing but whitespace.
pub const EMPTY_DESCRIPTION_FALLBACK: &str = "A visual scene suitable for generating a caption.";

/// Returned when the image couldn't be read or the request failed.
pub const UNANALYZED_IMAGE_FALLBACK: &str = "An image was provided but could not be analyzed.";

/// Describes images through an injected provider.
#[derive(Clone)]
pub struct ImageDescriber {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl ImageDescriber {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: DEFAULT_DESCRIPTION_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Describe the image at `image_path`.
    ///
    /// Returns the trimmed model text, which may be empty. The bytes are
    /// always labelled `image/jpeg` regardless of the actual format.
    pub async fn try_describe_image(
        &self,
        image_path: impl AsRef<Path>,
        max_tokens: u32,
    ) -> Result<String> {
        let path = image_path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| CaptionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let request = VisionRequest {
            image: ImageInput::jpeg(&bytes),
            prompt: DESCRIBE_IMAGE_PROMPT.to_string(),
            max_tokens,
            temperature: self.temperature,
        };

        let response = self.provider.describe(&request).await?;
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            bytes = bytes.len(),
            latency_ms = response.latency_ms,
            "Described {path:?}"
        );

        Ok(response.text.trim().to_string())
    }

    /// Describe the image at `image_path`, substituting a fixed sentence for
    /// empty answers and for any failure.
    pub async fn describe_image(&self, image_path: impl AsRef<Path>, max_tokens: u32) -> String {
        match self.try_describe_image(image_path, max_tokens).await {
            Ok(text) if text.is_empty() => EMPTY_DESCRIPTION_FALLBACK.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), "Error describing image: {e}");
                UNANALYZED_IMAGE_FALLBACK.to_string()
            }
        }
    }
}
