//! Shared CLI argument types: LLM provider selection.

use caption_core::{Captioner, Config};
use clap::{Args, ValueEnum};

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LlmProvider {
    /// OpenAI API (or any OpenAI-compatible endpoint)
    Openai,
    /// Anthropic API
    Anthropic,
    /// Local Ollama instance
    Ollama,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Openai => write!(f, "openai"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Ollama => write!(f, "ollama"),
        }
    }
}

/// Provider selection flags shared by every command that calls an LLM.
#[derive(Args, Debug, Default)]
pub struct LlmArgs {
    /// LLM provider (defaults to `llm.provider` from config)
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// LLM model name (provider-specific)
    #[arg(long)]
    pub llm_model: Option<String>,
}

impl LlmArgs {
    /// Build a captioner for these flags.
    pub fn captioner(&self, config: &Config) -> anyhow::Result<Captioner> {
        let provider = self.llm.map(|p| p.to_string());
        let captioner =
            Captioner::from_config(config, provider.as_deref(), self.llm_model.as_deref())?;
        tracing::debug!("Using LLM provider: {}", captioner.provider_name());
        Ok(captioner)
    }
}
