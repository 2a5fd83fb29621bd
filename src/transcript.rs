//! Transcript message model for the agent exchange.
//!
//! Every entry carries an explicit source and kind discriminant so the
//! extractor can dispatch on them instead of probing for attributes.

use serde::{Deserialize, Serialize};

/// Token an agent appends to signal it has finished its deliverable.
pub const SENTINEL: &str = "DONE";

/// Marker the recipe writer puts on its first line.
pub const DISH_MARKER: &str = "DISH:";

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The external user (the seeded image message).
    User,
    /// The dish identifier / recipe writer agent.
    RecipeWriter,
    /// The YouTube video finder agent.
    VideoFinder,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::User => "user",
            Source::RecipeWriter => "recipe_writer",
            Source::VideoFinder => "video_finder",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of entry this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain conversational text.
    Text,
    /// An agent invoking a tool; content holds the call arguments.
    ToolCall,
    /// The tool's raw return payload.
    ToolResult,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub source: Source,
    pub kind: MessageKind,
    /// Text content or the tool payload, depending on kind.
    pub content: String,
    /// Data URL of an attached image (only on the seeded user message).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    /// A plain text message from an agent.
    pub fn text(source: Source, content: impl Into<String>) -> Self {
        Self {
            source,
            kind: MessageKind::Text,
            content: content.into(),
            image: None,
        }
    }

    /// A tool-invocation event recording the call arguments.
    pub fn tool_call(source: Source, arguments: impl Into<String>) -> Self {
        Self {
            source,
            kind: MessageKind::ToolCall,
            content: arguments.into(),
            image: None,
        }
    }

    /// A tool-result event recording the raw payload.
    pub fn tool_result(source: Source, payload: impl Into<String>) -> Self {
        Self {
            source,
            kind: MessageKind::ToolResult,
            content: payload.into(),
            image: None,
        }
    }

    /// The seeded multimodal user message that starts an exchange.
    pub fn seed(instruction: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            source: Source::User,
            kind: MessageKind::Text,
            content: instruction.into(),
            image: Some(image_data_url.into()),
        }
    }

    /// Whether this entry marks a tool event (call or result).
    pub fn is_tool_event(&self) -> bool {
        matches!(self.kind, MessageKind::ToolCall | MessageKind::ToolResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_message_shape() {
        let msg = Message::seed("identify this", "data:image/png;base64,AAAA");
        assert_eq!(msg.source, Source::User);
        assert_eq!(msg.kind, MessageKind::Text);
        assert!(msg.image.as_deref().unwrap().starts_with("data:image/png"));
    }

    #[test]
    fn test_tool_events() {
        let call = Message::tool_call(Source::VideoFinder, r#"{"query": "pad thai recipe"}"#);
        let result = Message::tool_result(Source::VideoFinder, "[]");
        assert!(call.is_tool_event());
        assert!(result.is_tool_event());
        assert!(!Message::text(Source::RecipeWriter, "hi").is_tool_event());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::RecipeWriter.to_string(), "recipe_writer");
        assert_eq!(Source::VideoFinder.as_str(), "video_finder");
    }
}
