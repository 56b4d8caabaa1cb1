//! Prompt templates for caption generation and caption edits.
//!
//! Both builders are pure: inputs are interpolated verbatim, nothing is
//! validated or escaped.

use crate::types::{edit_instruction, CaptionInput, EditRequest};

/// System message sent with every structured caption request.
pub const CAPTION_SYSTEM_PROMPT: &str = "You are a creative social media caption generator.";

/// Fixed instruction sent alongside an image for description.
pub const DESCRIBE_IMAGE_PROMPT: &str = "Analyze the image and describe it in 2–3 short sentences, \
     as if writing a natural social media caption context. \
     Avoid technical terms and keep it warm and human-like.";

/// Build a caption-writing prompt for one platform.
pub fn build_platform_prompt(input: &CaptionInput, platform: &str) -> String {
    format!(
        "\nYou are an AI social media assistant for small business owners.\n\
         Your tasks:\n\
         \n\
         -Understand the content, tone, and business type.\n\
         -Write a short, engaging caption (2–4 sentences) that fits the platform {platform}.\n\
         -Post type: {post_type}, Topic: {post_topic}\n\
         -Keep it modern, relatable, and relevant. Add a call-to-action if suitable.\n\
         -Include 5–10 trending or niche hashtags in JSON format.\n",
        post_type = input.post_type,
        post_topic = input.post_topic,
    )
}

/// Build a prompt asking the model to edit an existing caption.
pub fn build_edit_prompt(edit: &EditRequest) -> String {
    let instruction = edit_instruction(&edit.edit_type);
    format!(
        "Edit the social media caption for {platform}.\n\n\
         -Original caption: \"{original}\"\n\n\
         -{instruction}:\n\n\
         -Include 5-10 trending or niche hashtags in JSON format\n\
         -Json format is given below as reference:\n\
         -Output JSON: {{\n    \
             \"caption\": \"edited caption\",\n    \
             \"hashtags\": [\"#tag1\", \"#tag2\", ...]\n\
         }}.",
        platform = edit.platform,
        original = edit.original_caption,
    )
}
