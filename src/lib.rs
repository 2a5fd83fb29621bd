//! Dishscout - dish identification and recipe discovery
//!
//! A CLI tool that takes a food photo, identifies the dish, writes a recipe,
//! and finds related YouTube videos.
//!
//! # Overview
//!
//! Two cooperating LLM agents run in a fixed-turn round-robin exchange:
//!
//! - The *recipe writer* looks at the image and answers with a `DISH: <name>`
//!   first line followed by a recipe.
//! - The *video finder* reads the dish name, calls the YouTube search tool,
//!   and renders the results as a markdown table ending with a `DONE` token.
//!
//! The transcript of that exchange is then mined by the extractor, which
//! recovers the recipe text and a normalized list of video rows using a
//! layered best-effort fallback chain (tool payloads, markdown table,
//! embedded literals).
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `vision` - Image decoding and data-URL encoding
//! - `search` - YouTube search client and tool definition
//! - `transcript` - Transcript message model
//! - `agents` - The two conversational participants
//! - `team` - Round-robin turn driver
//! - `extract` - Recipe and video-row extraction
//! - `pipeline` - The single public entry point
//!
//! # Example
//!
//! ```rust,no_run
//! use dishscout::config::Settings;
//! use dishscout::pipeline::analyze_image;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let bytes = std::fs::read("dinner.jpg")?;
//!
//!     let (recipe, rows) = analyze_image(&settings, &bytes).await;
//!     println!("{}", recipe);
//!     println!("{} videos found", rows.len());
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod openai;
pub mod pipeline;
pub mod search;
pub mod team;
pub mod transcript;
pub mod vision;

pub use error::{DishscoutError, Result};
pub use pipeline::analyze_image;
