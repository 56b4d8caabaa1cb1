//! LLM integration for caption generation and image description.
//!
//! Provides a provider abstraction over multiple LLM backends (OpenAI and
//! OpenAI-compatible endpoints, Anthropic, Ollama). Each backend implements
//! schema-constrained generation and single-image description in its own
//! wire format.

pub(crate) mod anthropic;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{
    parse_json_text, resolve_env_var, ImageInput, LlmProvider, LlmProviderFactory, LlmResponse,
    OutputSchema, StructuredRequest, StructuredResponse, VisionRequest,
};

#[cfg(test)]
pub(crate) mod mock;
