//! The `caption generate` and `caption edit` commands.

use caption_core::{CaptionInput, CaptionResult, Config, EditRequest};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::{print_json, with_spinner};
use super::types::LlmArgs;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target platform; repeat for one caption per platform
    #[arg(short, long = "platform", required = true)]
    pub platforms: Vec<String>,

    /// Kind of post (e.g., "Promotion", "Announcement")
    #[arg(short = 't', long)]
    pub post_type: String,

    /// What the post is about
    #[arg(long)]
    pub topic: String,

    /// Describe this image first and add the description to the topic
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Override `generation.caption_max_tokens`
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

/// Arguments for the `edit` command.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Target platform
    #[arg(short, long)]
    pub platform: String,

    /// Edit intent: rephrase, shorten, expand, "more formal", "more casual",
    /// "more creative" (anything else asks for a general improvement)
    #[arg(short, long)]
    pub edit_type: String,

    /// The caption to edit
    #[arg(short = 'c', long = "caption")]
    pub original_caption: String,

    /// Override `generation.caption_max_tokens`
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

/// One platform's caption in `generate` output.
#[derive(Debug, Serialize)]
struct PlatformCaption {
    platform: String,
    #[serde(flatten)]
    result: CaptionResult,
}

/// Fold an image description into the post topic.
fn topic_with_image_context(topic: &str, description: &str) -> String {
    format!("{topic}. Image context: {description}")
}

/// Execute the generate command.
pub async fn execute_generate(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let captioner = args.llm.captioner(config)?;

    let mut topic = args.topic.clone();
    if let Some(image) = &args.image {
        let image = PathBuf::from(shellexpand::tilde(&image.to_string_lossy()).into_owned());
        let description =
            with_spinner("Describing image...", captioner.describe_image(&image, None)).await;
        tracing::info!("Image context: {description}");
        topic = topic_with_image_context(&topic, &description);
    }

    let mut captions = Vec::with_capacity(args.platforms.len());
    for platform in &args.platforms {
        let input = CaptionInput {
            platform: platform.clone(),
            post_type: args.post_type.clone(),
            post_topic: topic.clone(),
        };
        let result = with_spinner(
            &format!("Writing {platform} caption..."),
            captioner.caption_for(&input, platform, args.max_tokens),
        )
        .await;

        if result.is_empty() {
            tracing::warn!("No caption generated for {platform}");
        }
        captions.push(PlatformCaption {
            platform: platform.clone(),
            result,
        });
    }

    match captions.as_slice() {
        [single] => print_json(&single.result, args.pretty),
        _ => print_json(&captions, args.pretty),
    }
}

/// Execute the edit command.
pub async fn execute_edit(args: EditArgs, config: &Config) -> anyhow::Result<()> {
    let captioner = args.llm.captioner(config)?;

    let edit = EditRequest {
        platform: args.platform,
        edit_type: args.edit_type,
        original_caption: args.original_caption,
    };
    let result = with_spinner(
        "Editing caption...",
        captioner.edit_caption(&edit, args.max_tokens),
    )
    .await;

    if result.is_empty() {
        tracing::warn!("No edited caption generated");
    }
    print_json(&result, args.pretty)
}
