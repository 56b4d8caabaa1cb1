//! Core data types for caption requests and results.

use serde::{Deserialize, Serialize};

/// Description of a post to write a caption for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionInput {
    /// Target platform (e.g., "Instagram", "LinkedIn")
    #[serde(default)]
    pub platform: String,

    /// Kind of post ("promotion", "announcement", ...)
    pub post_type: String,

    /// What the post is about
    pub post_topic: String,
}

/// A request to rework an existing caption.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditRequest {
    /// Target platform
    pub platform: String,

    /// Edit intent tag, matched case-insensitively (see [`EditType`])
    pub edit_type: String,

    /// The caption to edit, embedded verbatim in the prompt
    pub original_caption: String,
}

/// A generated caption with its hashtags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionResult {
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl CaptionResult {
    /// The result returned when generation fails for any reason.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.caption.is_empty() && self.hashtags.is_empty()
    }
}

/// Instruction used when the edit tag matches none of the known intents.
pub const DEFAULT_EDIT_INSTRUCTION: &str = "Improve the caption to make it more engaging.";

/// The fixed set of edit intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    Rephrase,
    Shorten,
    Expand,
    MoreFormal,
    MoreCasual,
    MoreCreative,
}

impl EditType {
    pub const ALL: [EditType; 6] = [
        EditType::Rephrase,
        EditType::Shorten,
        EditType::Expand,
        EditType::MoreFormal,
        EditType::MoreCasual,
        EditType::MoreCreative,
    ];

    /// Resolve a user-supplied tag.
    ///
    /// The tag is lower-cased before matching; no trimming or other
    /// normalization happens, so `" shorten"` does not match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "rephrase" => Some(Self::Rephrase),
            "shorten" => Some(Self::Shorten),
            "expand" => Some(Self::Expand),
            "more formal" => Some(Self::MoreFormal),
            "more casual" => Some(Self::MoreCasual),
            "more creative" => Some(Self::MoreCreative),
            _ => None,
        }
    }

    /// Canonical lower-case tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rephrase => "rephrase",
            Self::Shorten => "shorten",
            Self::Expand => "expand",
            Self::MoreFormal => "more formal",
            Self::MoreCasual => "more casual",
            Self::MoreCreative => "more creative",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Rephrase => "Rephrase without changing meaning.",
            Self::Shorten => "Make it concise and engaging.",
            Self::Expand => "Add more enticing details.",
            Self::MoreFormal => "Make it formal and professional.",
            Self::MoreCasual => "Make it casual and friendly.",
            Self::MoreCreative => "Make it creative and eye-catching.",
        }
    }
}

/// Map an edit tag to its instruction sentence, falling back to
/// [`DEFAULT_EDIT_INSTRUCTION`].
pub fn edit_instruction(tag: &str) -> &'static str {
    EditType::from_tag(tag)
        .map(|t| t.instruction())
        .unwrap_or(DEFAULT_EDIT_INSTRUCTION)
}

impl std::fmt::Display for EditType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
