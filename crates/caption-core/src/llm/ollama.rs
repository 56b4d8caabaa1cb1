//! Ollama LLM provider for local model inference.
//!
//! Talks to a local Ollama instance via its `/api/chat` endpoint. The JSON
//! schema goes in the `format` field; images ride along on the user message.
//! No authentication; needs a local Ollama server.

use super::provider::{
    parse_json_text, LlmProvider, LlmResponse, StructuredRequest, StructuredResponse,
    VisionRequest,
};
use crate::error::CaptionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Ollama provider for local model inference.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            // Vision models running locally can be slow
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn chat(&self, body: &OllamaChatRequest) -> Result<OllamaChatResponse, CaptionError> {
        let url = format!("{}/api/chat", self.endpoint);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CaptionError::provider(format!("Ollama request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Provider {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        resp.json()
            .await
            .map_err(|e| CaptionError::schema(format!("Failed to parse Ollama response: {e}")))
    }
}

/// Ollama /api/chat request body.
#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_predict: u32,
}

/// Ollama /api/chat response.
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaReply,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaReply {
    content: String,
}

impl OllamaChatResponse {
    fn tokens_used(&self) -> Option<u32> {
        match (self.prompt_eval_count, self.eval_count) {
            (None, None) => None,
            (prompt, eval) => Some(prompt.unwrap_or(0).saturating_add(eval.unwrap_or(0))),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, CaptionError> {
        let start = Instant::now();

        let body = OllamaChatRequest {
            model: self.model.clone(),
            stream: false,
            format: Some(request.schema.schema.clone()),
            options: OllamaOptions {
                temperature: None,
                num_predict: request.max_tokens,
            },
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                    images: Vec::new(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                    images: Vec::new(),
                },
            ],
        };

        let resp = self.chat(&body).await?;
        let tokens_used = resp.tokens_used();

        Ok(StructuredResponse {
            value: parse_json_text(&resp.message.content)?,
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn describe(&self, request: &VisionRequest) -> Result<LlmResponse, CaptionError> {
        let start = Instant::now();

        let body = OllamaChatRequest {
            model: self.model.clone(),
            stream: false,
            format: None,
            options: OllamaOptions {
                temperature: Some(request.temperature),
                num_predict: request.max_tokens,
            },
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
                images: vec![request.image.data.clone()],
            }],
        };

        let resp = self.chat(&body).await?;
        let tokens_used = resp.tokens_used();

        Ok(LlmResponse {
            text: resp.message.content,
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
