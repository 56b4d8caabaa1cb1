//! Structured caption generation.
//!
//! One prompt in, one `{caption, hashtags}` object out. The provider is asked
//! for schema-constrained output; whatever comes back is checked against
//! [`CaptionResult`] before it is handed to the caller.

use crate::error::{CaptionError, Result};
use crate::llm::{LlmProvider, OutputSchema, StructuredRequest};
use crate::prompt::CAPTION_SYSTEM_PROMPT;
use crate::types::CaptionResult;
use serde_json::json;
use std::sync::Arc;

/// Output token budget used when the caller has no opinion.
pub const DEFAULT_CAPTION_MAX_TOKENS: u32 = 1550;

/// Name under which the caption schema is sent to providers.
pub const CAPTION_SCHEMA_NAME: &str = "caption_format";

/// JSON schema for a [`CaptionResult`].
pub fn caption_schema() -> OutputSchema {
    OutputSchema {
        name: CAPTION_SCHEMA_NAME.to_string(),
        description: Some("A social media caption with relevant hashtags".to_string()),
        schema: json!({
            "type": "object",
            "properties": {
                "caption": {
                    "type": "string",
                    "description": "Love yourself first before prioritising other"
                },
                "hashtags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Relevant hashtags like #selflove, #loveyourself, #love"
                }
            },
            "required": ["caption", "hashtags"],
            "additionalProperties": false
        }),
    }
}

/// Generates captions through an injected provider.
#[derive(Clone)]
pub struct CaptionGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl CaptionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate a caption, reporting why it failed if it did.
    pub async fn try_generate_caption(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<CaptionResult> {
        let request = StructuredRequest {
            system: CAPTION_SYSTEM_PROMPT.to_string(),
            prompt: prompt.to_string(),
            schema: caption_schema(),
            max_tokens,
        };

        let response = self.provider.generate_structured(&request).await?;
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            tokens = ?response.tokens_used,
            latency_ms = response.latency_ms,
            "Caption result: {}",
            response.value
        );

        serde_json::from_value(response.value).map_err(|e| {
            CaptionError::schema(format!("Caption output does not match schema: {e}"))
        })
    }

    /// Generate a caption; any failure yields [`CaptionResult::empty`].
    pub async fn generate_caption(&self, prompt: &str, max_tokens: u32) -> CaptionResult {
        match self.try_generate_caption(prompt, max_tokens).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(provider = self.provider.name(), "Caption generation failed: {e}");
                CaptionResult::empty()
            }
        }
    }
}
