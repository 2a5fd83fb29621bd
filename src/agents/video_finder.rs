//! YouTube video finder agent with tool calling loop.

use super::{transcript_to_chat, Participant};
use crate::error::{DishscoutError, Result};
use crate::search::{parse_tool_call, tool_definitions, SearchClient, ToolCall};
use crate::transcript::{Message, Source};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestToolMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// System prompt for the video finder.
const SYSTEM_PROMPT: &str = "Wait for the previous message to contain the dish identified from the image. \
Read the line that starts with 'DISH:' to get the dish name. \
Then call the tool `youtube_search` with a query like '<dish name> recipe'. \
**Do NOT print raw JSON or Python lists.** \
Return the top 3-5 results as a Markdown table with headers exactly:\n\
| Title | URL | Channel | Duration | Views |\n\
Each row must contain those five columns. \
After the table, end your message with the word: DONE";

/// Maximum model round-trips within a single turn.
const MAX_TOOL_ROUNDS: usize = 4;

/// Agent that finds YouTube videos for the identified dish.
///
/// The only participant holding the search tool. One turn may record a
/// sequence of tool call/result events before the summarizing text message.
pub struct VideoFinder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    search: SearchClient,
    max_results: usize,
}

impl VideoFinder {
    /// Create a new video finder bound to the given client, model and search client.
    pub fn new(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
        search: SearchClient,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            search,
            max_results,
        }
    }

    /// Execute one tool call, folding any failure into the payload string.
    ///
    /// The extractor treats an undecodable payload as "no rows", so a
    /// provider fault must not abort the exchange.
    async fn execute_tool(&self, name: &str, arguments: &str) -> String {
        info!("Video finder calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(ToolCall::YoutubeSearch { query, max_results }) => {
                let limit = max_results.min(self.max_results);
                match self.search.search(&query, limit).await {
                    Ok(hits) => serde_json::to_string(&hits)
                        .unwrap_or_else(|e| format!("Tool error: {}", e)),
                    Err(e) => format!("Tool error: {}", e),
                }
            }
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        result
    }
}

#[async_trait]
impl Participant for VideoFinder {
    fn source(&self) -> Source {
        Source::VideoFinder
    }

    async fn take_turn(&self, transcript: &[Message]) -> Result<Vec<Message>> {
        let mut chat = transcript_to_chat(Source::VideoFinder, SYSTEM_PROMPT, transcript)?;
        let mut produced = Vec::new();

        for round in 0..MAX_TOOL_ROUNDS {
            debug!("Video finder round {}", round + 1);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(chat.clone())
                .tools(tool_definitions())
                .build()
                .map_err(|e| DishscoutError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| DishscoutError::OpenAI(format!("Video finder API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| DishscoutError::Agent("No response from model".to_string()))?;

            match &choice.message.tool_calls {
                Some(tool_calls) if !tool_calls.is_empty() => {
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls.clone())
                        .build()
                        .map_err(|e| DishscoutError::Agent(e.to_string()))?;
                    chat.push(assistant_msg.into());

                    for tool_call in tool_calls {
                        produced.push(Message::tool_call(
                            Source::VideoFinder,
                            tool_call.function.arguments.clone(),
                        ));

                        let payload = self
                            .execute_tool(&tool_call.function.name, &tool_call.function.arguments)
                            .await;

                        produced.push(Message::tool_result(Source::VideoFinder, payload.clone()));

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(payload)
                            .build()
                            .map_err(|e| DishscoutError::Agent(e.to_string()))?;
                        chat.push(tool_msg.into());
                    }
                }
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    produced.push(Message::text(Source::VideoFinder, content));
                    return Ok(produced);
                }
            }
        }

        Err(DishscoutError::Agent(format!(
            "Video finder exceeded maximum tool rounds ({})",
            MAX_TOOL_ROUNDS
        )))
    }
}
