//! LLM provider trait and request/response types.
//!
//! A provider exposes two capabilities: schema-constrained generation
//! (captions) and single-image description. How each one is put on the
//! wire is the provider's business.

use crate::config::LlmConfig;
use crate::error::CaptionError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type, always "image/jpeg"
    pub media_type: String,
}

impl ImageInput {
    /// Encode raw bytes as a JPEG image. The bytes are not inspected.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: "image/jpeg".to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A named JSON schema the model output must conform to.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema object (`{"type": "object", ...}`)
    pub schema: serde_json::Value,
}

/// A request for schema-constrained output.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub system: String,
    pub prompt: String,
    pub schema: OutputSchema,
    pub max_tokens: u32,
}

/// Parsed output of a structured request.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// Object produced by the model. Providers guarantee it parsed as JSON,
    /// not that it satisfies the schema.
    pub value: serde_json::Value,
    pub model: String,
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
}

/// A request to describe a single image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub image: ImageInput,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Free-text response from a vision request.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, untrimmed
    pub text: String,
    pub model: String,
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn LlmProvider>` for injection).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "anthropic", "ollama").
    fn name(&self) -> &str;

    /// Generate output conforming to `request.schema`.
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, CaptionError>;

    /// Describe the image in `request`.
    async fn describe(&self, request: &VisionRequest) -> Result<LlmResponse, CaptionError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Parse a JSON object out of a model's text reply.
///
/// Models sometimes wrap JSON in a markdown fence even when asked not to,
/// so a surrounding ```` ```json ```` block is stripped first.
pub fn parse_json_text(text: &str) -> Result<serde_json::Value, CaptionError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body)
        .map_err(|e| CaptionError::schema(format!("Model output is not valid JSON: {e}")))
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider by name.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("openai", "anthropic", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `timeout` - Per-request timeout applied by the provider
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, CaptionError> {
        match provider {
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    CaptionError::provider("OpenAI API key not set. Set OPENAI_API_KEY env var.")
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(
                    super::openai::OpenAiProvider::with_endpoint(&api_key, &model, &cfg.endpoint)
                        .with_timeout(timeout),
                ))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    CaptionError::provider(
                        "Anthropic API key not set. Set ANTHROPIC_API_KEY env var.",
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(
                    super::anthropic::AnthropicProvider::new(&api_key, &model)
                        .with_timeout(timeout),
                ))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                // Local vision models are slow; never go below the Ollama default.
                let provider = super::ollama::OllamaProvider::new(&cfg.endpoint, &model);
                let timeout = timeout.max(provider.timeout());
                Ok(Box::new(provider.with_timeout(timeout)))
            }
            other => Err(CaptionError::provider(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    #[test]
    fn test_image_input_jpeg() {
        let input = ImageInput::jpeg(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(input.media_type, "image/jpeg");
        assert_eq!(input.data, "/9j/");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::jpeg(&[1, 2, 3]);
        assert_eq!(input.data_url(), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn test_parse_json_text_plain() {
        let value = parse_json_text(r##"{"caption": "hi", "hashtags": ["#a"]}"##).unwrap();
        assert_eq!(value["caption"], "hi");
    }

    #[test]
    fn test_parse_json_text_fenced() {
        let text = "```json\n{\"caption\": \"hi\", \"hashtags\": []}\n```\n";
        let value = parse_json_text(text).unwrap();
        assert_eq!(value["caption"], "hi");

        let text = "```\n{\"caption\": \"bare\"}\n```";
        assert_eq!(parse_json_text(text).unwrap()["caption"], "bare");
    }

    #[test]
    fn test_parse_json_text_rejects_prose() {
        let err = parse_json_text("Sure! Here is your caption.").unwrap_err();
        assert!(matches!(err, CaptionError::Schema { .. }));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let result = LlmProviderFactory::create(
            "mystery",
            &LlmConfig::default(),
            None,
            Duration::from_secs(1),
        );
        let err = result.err().expect("unknown provider must fail");
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_factory_requires_api_key() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "${DEFINITELY_NOT_SET_XYZ_456}".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = LlmProviderFactory::create("openai", &config, None, Duration::from_secs(1));
        let err = result.err().expect("missing key must fail");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_factory_applies_model_override() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "sk-test".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let provider = LlmProviderFactory::create(
            "openai",
            &config,
            Some("gpt-4o"),
            Duration::from_secs(7),
        )
        .unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_factory_ollama_keeps_minimum_timeout() {
        let provider = LlmProviderFactory::create(
            "ollama",
            &LlmConfig::default(),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.timeout(), Duration::from_secs(120));
    }
}
