//! The `caption prompt` command: render prompts offline.

use caption_core::{build_edit_prompt, build_platform_prompt, CaptionInput, EditRequest};
use clap::{Args, Subcommand};

/// Arguments for the `prompt` command.
#[derive(Args, Debug)]
pub struct PromptArgs {
    #[command(subcommand)]
    pub command: PromptCommand,
}

/// Which prompt to render.
#[derive(Subcommand, Debug)]
pub enum PromptCommand {
    /// Prompt for a new caption
    Platform {
        #[arg(short, long)]
        platform: String,
        #[arg(short = 't', long)]
        post_type: String,
        #[arg(long)]
        topic: String,
    },

    /// Prompt for a caption edit
    Edit {
        #[arg(short, long)]
        platform: String,
        #[arg(short, long)]
        edit_type: String,
        #[arg(short = 'c', long = "caption")]
        original_caption: String,
    },
}

/// Render the prompt for `command`.
pub fn render(command: PromptCommand) -> String {
    match command {
        PromptCommand::Platform {
            platform,
            post_type,
            topic,
        } => {
            let input = CaptionInput {
                platform: platform.clone(),
                post_type,
                post_topic: topic,
            };
            build_platform_prompt(&input, &platform)
        }
        PromptCommand::Edit {
            platform,
            edit_type,
            original_caption,
        } => build_edit_prompt(&EditRequest {
            platform,
            edit_type,
            original_caption,
        }),
    }
}

/// Execute the prompt command.
pub fn execute(args: PromptArgs) -> anyhow::Result<()> {
    println!("{}", render(args.command));
    Ok(())
}
