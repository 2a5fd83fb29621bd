//! YouTube video search tool.
//!
//! Queries the public results page (no API key) and maps the embedded
//! `ytInitialData` payload to a bounded list of structured records. The tool
//! performs no retries; a provider fault propagates to the calling agent.

use crate::error::{DishscoutError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Fixed domain prefix joined with each result's watch suffix.
const WATCH_DOMAIN: &str = "https://www.youtube.com";

/// Timeout for the results-page fetch.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// One video search result, provider field names preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub duration: String,
    pub views: String,
}

/// Client for the YouTube search results page.
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    /// Create a client against the given base URL.
    ///
    /// The base URL is configurable so tests can point at a local server;
    /// result URLs always carry the real youtube.com prefix regardless.
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search for videos, returning at most `max_results` records.
    ///
    /// May return fewer records, or none, if the page yields nothing.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = Url::parse_with_params(
            &format!("{}/results", self.base_url),
            &[("search_query", query)],
        )
        .map_err(|e| DishscoutError::Search(e.to_string()))?;

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_results_page(&body, max_results)
    }
}

/// Extract video records from a results page body.
pub fn parse_results_page(body: &str, max_results: usize) -> Result<Vec<SearchHit>> {
    let re = Regex::new(r"(?s)ytInitialData\s*=\s*(\{.*?\})\s*;\s*</script>")
        .map_err(|e| DishscoutError::Search(e.to_string()))?;
    let raw = re
        .captures(body)
        .map(|c| c[1].to_string())
        .ok_or_else(|| DishscoutError::Search("no ytInitialData in results page".to_string()))?;

    let data: Value = serde_json::from_str(&raw)?;
    let sections = data
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
        .and_then(Value::as_array)
        .ok_or_else(|| DishscoutError::Search("unexpected results page layout".to_string()))?;

    let mut hits = Vec::new();
    for section in sections {
        let Some(items) = section
            .pointer("/itemSectionRenderer/contents")
            .and_then(Value::as_array)
        else {
            continue;
        };

        for item in items {
            // Ads, shelves and playlists use other renderers; skip them.
            let Some(video) = item.get("videoRenderer") else {
                continue;
            };
            let Some(id) = video.get("videoId").and_then(Value::as_str) else {
                continue;
            };

            hits.push(SearchHit {
                title: text_at(video, "/title/runs/0/text"),
                url: format!("{}/watch?v={}", WATCH_DOMAIN, id),
                channel: text_at(video, "/ownerText/runs/0/text"),
                duration: text_at(video, "/lengthText/simpleText"),
                views: text_at(video, "/viewCountText/simpleText"),
            });

            if hits.len() >= max_results {
                return Ok(hits);
            }
        }
    }

    Ok(hits)
}

fn text_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Tool calls available to the video finder agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search YouTube for recipe videos.
    YoutubeSearch {
        query: String,
        #[serde(default = "default_max_results")]
        max_results: usize,
    },
}

fn default_max_results() -> usize {
    5
}

/// Get OpenAI function/tool definitions for the video finder agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: "youtube_search".to_string(),
            description: Some(
                "Find relevant YouTube recipe videos for a given dish name or recipe query."
                    .to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query, e.g. '<dish name> recipe'"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results (default: 5)",
                        "default": 5
                    }
                },
                "required": ["query"]
            })),
            strict: None,
        },
    }]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: Value = serde_json::from_str(arguments)
        .map_err(|e| DishscoutError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "youtube_search" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| DishscoutError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let max_results = args["max_results"].as_u64().unwrap_or(5) as usize;
            Ok(ToolCall::YoutubeSearch { query, max_results })
        }
        _ => Err(DishscoutError::Agent(format!("Unknown tool: {}", name))),
    }
}
