//! Dish identifier / recipe writer agent.

use super::{transcript_to_chat, Participant};
use crate::error::{DishscoutError, Result};
use crate::transcript::{Message, Source};
use async_openai::types::CreateChatCompletionRequestArgs;
use async_trait::async_trait;
use tracing::debug;

/// System prompt for the recipe writer.
const SYSTEM_PROMPT: &str = "You analyze the provided food image.\n\
1) Output the dish name as the FIRST line exactly like: DISH: <dish name>\n\
2) Then give a concise, step-by-step recipe, with ingredients (with measures) and method.\n\
Keep the output clean and scannable.";

/// Agent that identifies the dish in the seeded image and writes a recipe.
///
/// Produces exactly one text message per turn and never calls tools.
pub struct RecipeWriter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl RecipeWriter {
    /// Create a new recipe writer bound to the given client and model.
    pub fn new(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Participant for RecipeWriter {
    fn source(&self) -> Source {
        Source::RecipeWriter
    }

    async fn take_turn(&self, transcript: &[Message]) -> Result<Vec<Message>> {
        let chat = transcript_to_chat(Source::RecipeWriter, SYSTEM_PROMPT, transcript)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(chat)
            .build()
            .map_err(|e| DishscoutError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| DishscoutError::OpenAI(format!("Recipe writer API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .ok_or_else(|| DishscoutError::Agent("No response from model".to_string()))?
            .message
            .content
            .clone()
            .unwrap_or_default();

        debug!("Recipe writer produced {} chars", content.len());

        Ok(vec![Message::text(Source::RecipeWriter, content)])
    }
}
