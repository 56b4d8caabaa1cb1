//! The `caption describe` command.

use caption_core::Config;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::{print_json, with_spinner};
use super::types::LlmArgs;

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Image file to describe (sent as JPEG)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Override `generation.description_max_tokens`
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print only the description text instead of JSON
    #[arg(long)]
    pub text: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Debug, Serialize)]
struct DescribeOutput {
    image: PathBuf,
    description: String,
}

/// Execute the describe command.
pub async fn execute(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let image = PathBuf::from(shellexpand::tilde(&args.image.to_string_lossy()).into_owned());
    if !image.exists() {
        // Still goes through the describer so the output is the usual fallback.
        tracing::warn!("Image does not exist: {image:?}");
    }

    let captioner = args.llm.captioner(config)?;
    let description = with_spinner(
        "Describing image...",
        captioner.describe_image(&image, args.max_tokens),
    )
    .await;

    if args.text {
        println!("{description}");
        Ok(())
    } else {
        print_json(&DescribeOutput { image, description }, args.pretty)
    }
}
