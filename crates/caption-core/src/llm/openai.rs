//! OpenAI LLM provider using the Chat Completions API.
//!
//! Structured output goes through `response_format: json_schema`; images are
//! sent as data URLs in the user message content array. Works against any
//! OpenAI-compatible endpoint that honours those two fields.

use super::provider::{
    parse_json_text, LlmProvider, LlmResponse, StructuredRequest, StructuredResponse,
    VisionRequest,
};
use crate::error::CaptionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
    }

    /// Create with a custom endpoint (full chat completions URL).
    pub fn with_endpoint(api_key: &str, model: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post(&self, body: &ChatRequest) -> Result<ChatResponse, CaptionError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CaptionError::provider(format!("OpenAI request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Provider {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        resp.json()
            .await
            .map_err(|e| CaptionError::schema(format!("Failed to parse OpenAI response: {e}")))
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    schema: serde_json::Value,
    strict: bool,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl ChatResponse {
    fn first_message(self) -> Result<(ChoiceMessage, String, Option<u32>), CaptionError> {
        let tokens = self.usage.map(|u| u.total_tokens);
        let message = self
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| CaptionError::schema("OpenAI returned empty choices array"))?;
        Ok((message, self.model, tokens))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, CaptionError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: None,
            max_completion_tokens: Some(request.max_tokens),
            temperature: None,
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema.name.clone(),
                    description: request.schema.description.clone(),
                    schema: request.schema.schema.clone(),
                    strict: true,
                },
            }),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(request.system.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Text(request.prompt.clone()),
                },
            ],
        };

        let (message, model, tokens_used) = self.post(&body).await?.first_message()?;

        if let Some(refusal) = message.refusal {
            return Err(CaptionError::provider(format!("OpenAI refused: {refusal}")));
        }
        let content = message
            .content
            .ok_or_else(|| CaptionError::schema("OpenAI returned no message content"))?;

        Ok(StructuredResponse {
            value: parse_json_text(&content)?,
            model,
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn describe(&self, request: &VisionRequest) -> Result<LlmResponse, CaptionError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: Some(request.max_tokens),
            max_completion_tokens: None,
            temperature: Some(request.temperature),
            response_format: None,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ]),
            }],
        };

        let (message, model, tokens_used) = self.post(&body).await?.first_message()?;
        let text = message
            .content
            .ok_or_else(|| CaptionError::schema("OpenAI returned no message content"))?;

        Ok(LlmResponse {
            text,
            model,
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{ImageInput, OutputSchema};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAiProvider {
        let endpoint = format!("{}/v1/chat/completions", server.uri());
        OpenAiProvider::with_endpoint("sk-test", "gpt-4o-mini", &endpoint)
    }

    fn structured_request() -> StructuredRequest {
        StructuredRequest {
            system: "You are a test.".into(),
            prompt: "Write something.".into(),
            schema: OutputSchema {
                name: "caption_format".into(),
                description: None,
                schema: json!({"type": "object"}),
            },
            max_tokens: 1550,
        }
    }

    fn chat_reply(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"total_tokens": 42}
        }))
    }

    #[tokio::test]
    async fn test_structured_request_shape_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_completion_tokens": 1550,
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "caption_format", "strict": true}
                },
                "messages": [
                    {"role": "system", "content": "You are a test."},
                    {"role": "user", "content": "Write something."}
                ]
            })))
            .respond_with(chat_reply(json!(
                "{\"caption\":\"Love yourself first\",\"hashtags\":[\"#selflove\"]}"
            )))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server)
            .generate_structured(&structured_request())
            .await
            .unwrap();
        assert_eq!(response.value["caption"], "Love yourself first");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.tokens_used, Some(42));
    }

    #[tokio::test]
    async fn test_structured_refusal_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-4o-mini",
                "choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate_structured(&structured_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Provider { .. }));
        assert!(err.to_string().contains("can't help"));
    }

    #[tokio::test]
    async fn test_http_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate_structured(&structured_request())
            .await
            .unwrap_err();
        match err {
            CaptionError::Provider {
                status_code,
                message,
            } => {
                assert_eq!(status_code, Some(429));
                assert!(message.contains("rate limited"));
            }
            other => panic!("Expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_describe_sends_text_then_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "max_tokens": 100,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Describe."},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AQID"}}
                    ]
                }]
            })))
            .respond_with(chat_reply(json!("  A sunny day.  ")))
            .expect(1)
            .mount(&server)
            .await;

        let request = VisionRequest {
            image: ImageInput::jpeg(&[1, 2, 3]),
            prompt: "Describe.".into(),
            max_tokens: 100,
            temperature: 0.7,
        };
        let response = provider(&server).describe(&request).await.unwrap();
        // Trimming is the describer's job
        assert_eq!(response.text, "  A sunny day.  ");
    }

    #[tokio::test]
    async fn test_empty_choices_is_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"model": "gpt-4o-mini", "choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate_structured(&structured_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Schema { .. }));
    }
}
