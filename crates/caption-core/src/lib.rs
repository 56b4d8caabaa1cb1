//! Caption Core - LLM-backed social media captions.
//!
//! Builds prompts for new captions and caption edits, asks an LLM for a
//! structured `{caption, hashtags}` result, and describes images to give
//! the caption writer some context.
//!
//! # Architecture
//!
//! Everything is stateless. The only shared handle is the provider, which is
//! injected rather than held globally:
//!
//! ```text
//! CaptionInput / EditRequest → prompt → CaptionGenerator → CaptionResult
//! image path → ImageDescriber → description
//! ```
//!
//! Both generators are total: failures are logged and turned into fixed
//! sentinel values. The `try_*` variants return the typed error instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use caption_core::{CaptionInput, Captioner, Config};
//!
//! #[tokio::main]
//! async fn main() -> caption_core::Result<()> {
//!     let config = Config::load()?;
//!     let captioner = Captioner::from_config(&config, None, None)?;
//!
//!     let input = CaptionInput {
//!         platform: "Instagram".into(),
//!         post_type: "Promotion".into(),
//!         post_topic: "Weekend bakery sale".into(),
//!     };
//!     let result = captioner.caption_for(&input, &input.platform, None).await;
//!     println!("{} {:?}", result.caption, result.hashtags);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod describer;
pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use describer::{
    ImageDescriber, DEFAULT_DESCRIPTION_MAX_TOKENS, EMPTY_DESCRIPTION_FALLBACK,
    UNANALYZED_IMAGE_FALLBACK,
};
pub use error::{CaptionError, ConfigError, Result};
pub use generator::{CaptionGenerator, DEFAULT_CAPTION_MAX_TOKENS};
pub use llm::{LlmProvider, LlmProviderFactory};
pub use prompt::{build_edit_prompt, build_platform_prompt};
pub use types::{CaptionInput, CaptionResult, EditRequest, EditType};

use std::path::Path;
use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Caption front end: one provider, both generators, configured budgets.
pub struct Captioner {
    generator: CaptionGenerator,
    describer: ImageDescriber,
    caption_max_tokens: u32,
    description_max_tokens: u32,
    provider_name: String,
}

impl Captioner {
    /// Create a captioner around an existing provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: &Config) -> Self {
        tracing::debug!("Initializing Caption v{} with {}", VERSION, provider.name());
        let generation = &config.generation;
        Self {
            provider_name: provider.name().to_string(),
            generator: CaptionGenerator::new(provider.clone()),
            describer: ImageDescriber::new(provider)
                .with_temperature(generation.description_temperature as f32),
            caption_max_tokens: generation.caption_max_tokens,
            description_max_tokens: generation.description_max_tokens,
        }
    }

    /// Create a captioner, building the provider from config.
    ///
    /// `provider` and `model` override `llm.provider` and the provider's
    /// configured model.
    pub fn from_config(
        config: &Config,
        provider: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self> {
        let name = provider.unwrap_or(&config.llm.provider);
        let provider =
            LlmProviderFactory::create(name, &config.llm, model, config.llm_timeout())?;
        Ok(Self::new(Arc::from(provider), config))
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Write a new caption for `input` on `platform`.
    ///
    /// `max_tokens` overrides `generation.caption_max_tokens`.
    pub async fn caption_for(
        &self,
        input: &CaptionInput,
        platform: &str,
        max_tokens: Option<u32>,
    ) -> CaptionResult {
        let prompt = build_platform_prompt(input, platform);
        self.generator
            .generate_caption(&prompt, max_tokens.unwrap_or(self.caption_max_tokens))
            .await
    }

    /// Rework an existing caption.
    pub async fn edit_caption(&self, edit: &EditRequest, max_tokens: Option<u32>) -> CaptionResult {
        let prompt = build_edit_prompt(edit);
        self.generator
            .generate_caption(&prompt, max_tokens.unwrap_or(self.caption_max_tokens))
            .await
    }

    /// Describe an image for caption context.
    ///
    /// `max_tokens` overrides `generation.description_max_tokens`.
    pub async fn describe_image(
        &self,
        image_path: impl AsRef<Path>,
        max_tokens: Option<u32>,
    ) -> String {
        self.describer
            .describe_image(
                image_path,
                max_tokens.unwrap_or(self.description_max_tokens),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use serde_json::json;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_caption_for_uses_platform_prompt_and_budget() {
        let mock = Arc::new(MockProvider::structured(json!({
            "caption": "Fresh out of the oven!",
            "hashtags": ["#bakery"]
        })));
        let mut config = Config::default();
        config.generation.caption_max_tokens = 321;
        let captioner = Captioner::new(mock.clone(), &config);

        let input = CaptionInput {
            platform: "Instagram".into(),
            post_type: "Promotion".into(),
            post_topic: "Weekend sale".into(),
        };
        let result = captioner.caption_for(&input, "Instagram", None).await;
        assert_eq!(result.caption, "Fresh out of the oven!");

        let request = mock.last_structured.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, 321);
        assert!(request.prompt.contains("Weekend sale"));
        assert!(request.prompt.contains("Instagram"));

        captioner.caption_for(&input, "Instagram", Some(64)).await;
        let request = mock.last_structured.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, 64);
    }

    #[tokio::test]
    async fn test_edit_caption_embeds_instruction() {
        let mock = Arc::new(MockProvider::structured(json!({
            "caption": "Short.",
            "hashtags": []
        })));
        let captioner = Captioner::new(mock.clone(), &Config::default());

        let edit = EditRequest {
            platform: "X".into(),
            edit_type: "SHORTEN".into(),
            original_caption: "A very long caption about bread.".into(),
        };
        captioner.edit_caption(&edit, Some(200)).await;

        let request = mock.last_structured.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, 200);
        assert!(request
            .prompt
            .contains(EditType::Shorten.instruction()));
        assert!(request.prompt.contains("\"A very long caption about bread.\""));
    }

    #[tokio::test]
    async fn test_describe_image_missing_file() {
        let mock = Arc::new(MockProvider::describing("unused"));
        let captioner = Captioner::new(mock, &Config::default());
        let text = captioner.describe_image("/definitely/not/here.jpg", None).await;
        assert_eq!(text, UNANALYZED_IMAGE_FALLBACK);
    }

    #[test]
    fn test_from_config_reports_provider_errors() {
        let mut config = Config::default();
        config.llm.openai = Some(crate::config::OpenAiConfig {
            api_key: String::new(),
            ..Default::default()
        });
        let err = Captioner::from_config(&config, None, None).err().unwrap();
        assert!(matches!(err, CaptionError::Provider { .. }));

        let captioner = Captioner::from_config(&config, Some("ollama"), Some("llava")).unwrap();
        assert_eq!(captioner.provider_name(), "ollama");
    }
}
