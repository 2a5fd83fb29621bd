//! The two conversational participants of the exchange.

mod recipe_writer;
mod video_finder;

pub use recipe_writer::RecipeWriter;
pub use video_finder::VideoFinder;

use crate::error::{DishscoutError, Result};
use crate::transcript::{Message, MessageKind, Source};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
    ImageDetail, ImageUrlArgs,
};
use async_trait::async_trait;

/// A role that can take one turn in the exchange, producing one or more
/// transcript entries (a text message, or tool call/result events followed
/// by a summarizing text message).
#[async_trait]
pub trait Participant: Send + Sync {
    /// The source identifier this participant writes into the transcript.
    fn source(&self) -> Source;

    /// Produce this participant's contribution given the transcript so far.
    async fn take_turn(&self, transcript: &[Message]) -> Result<Vec<Message>>;
}

/// Map the transcript into a chat request message list for one participant.
///
/// This participant's own text becomes assistant messages, everyone else's
/// becomes user messages. Tool bookkeeping entries are skipped: the agent's
/// summarizing text already carries that information across turns.
pub(crate) fn transcript_to_chat(
    own: Source,
    system_prompt: &str,
    transcript: &[Message],
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut chat: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt.to_string())
            .build()
            .map_err(|e| DishscoutError::Agent(e.to_string()))?
            .into(),
    ];

    for msg in transcript {
        if msg.kind != MessageKind::Text {
            continue;
        }

        if msg.source == own {
            chat.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(|e| DishscoutError::Agent(e.to_string()))?
                    .into(),
            );
        } else if let Some(image_url) = &msg.image {
            let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
                ChatCompletionRequestMessageContentPartTextArgs::default()
                    .text(msg.content.clone())
                    .build()
                    .map_err(|e| DishscoutError::Agent(e.to_string()))?
                    .into(),
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(
                        ImageUrlArgs::default()
                            .url(image_url.clone())
                            .detail(ImageDetail::Auto)
                            .build()
                            .map_err(|e| DishscoutError::Agent(e.to_string()))?,
                    )
                    .build()
                    .map_err(|e| DishscoutError::Agent(e.to_string()))?
                    .into(),
            ];
            chat.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(parts)
                    .build()
                    .map_err(|e| DishscoutError::Agent(e.to_string()))?
                    .into(),
            );
        } else {
            chat.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map_err(|e| DishscoutError::Agent(e.to_string()))?
                    .into(),
            );
        }
    }

    Ok(chat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_to_chat_roles() {
        let transcript = vec![
            Message::seed("identify this", "data:image/png;base64,AAAA"),
            Message::text(Source::RecipeWriter, "DISH: Ramen\n..."),
            Message::tool_call(Source::VideoFinder, "{}"),
            Message::tool_result(Source::VideoFinder, "[]"),
            Message::text(Source::VideoFinder, "| Title | ... |\nDONE"),
        ];

        let chat = transcript_to_chat(Source::RecipeWriter, "prompt", &transcript).unwrap();

        // system + seed user + own assistant + other agent's text; tool events skipped
        assert_eq!(chat.len(), 4);
        assert!(matches!(chat[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(chat[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(chat[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(chat[3], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_transcript_to_chat_other_perspective() {
        let transcript = vec![
            Message::seed("identify this", "data:image/png;base64,AAAA"),
            Message::text(Source::RecipeWriter, "DISH: Ramen\n..."),
        ];

        let chat = transcript_to_chat(Source::VideoFinder, "prompt", &transcript).unwrap();

        // Everything is user input from the video finder's point of view.
        assert_eq!(chat.len(), 3);
        assert!(matches!(chat[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(chat[2], ChatCompletionRequestMessage::User(_)));
    }
}
