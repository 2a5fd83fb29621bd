//! The single public entry point of the pipeline.
//!
//! Decodes the image, runs the two-agent exchange, and extracts the
//! (recipe, rows) pair. This boundary never fails: every fault is folded
//! into a displayable pair so the presentation layer always has something
//! to render.

use crate::agents::{RecipeWriter, VideoFinder};
use crate::config::Settings;
use crate::extract::{self, VideoRow};
use crate::search::SearchClient;
use crate::team::Team;
use crate::transcript::{Message, SENTINEL};
use crate::{openai, vision};
use tracing::{info, instrument, warn};

/// Instruction text of the seeded user message.
const SEED_INSTRUCTION: &str = "Identify the dish and give me the recipe. \
Start with DISH: <name> on the first line. Then fetch YouTube links.";

/// Turn budget: two exchanges per agent.
const MAX_TURNS: usize = 4;

/// Analyze a food photo: identify the dish, write a recipe, find videos.
///
/// Returns the recipe markdown and the normalized video rows. On any
/// failure the recipe slot carries a descriptive message and the rows are
/// empty; this function never returns an error.
#[instrument(skip_all, fields(bytes = image_bytes.len()))]
pub async fn analyze_image(settings: &Settings, image_bytes: &[u8]) -> (String, Vec<VideoRow>) {
    let data_url = match vision::encode_image(image_bytes) {
        Ok(url) => url,
        Err(e) => {
            warn!("Image decode failed: {}", e);
            return (format!("Error reading image: {}", e), Vec::new());
        }
    };

    let client = openai::create_client(settings);
    let search = SearchClient::new(&settings.search.base_url);

    let team = Team::new(
        vec![
            Box::new(RecipeWriter::new(client.clone(), &settings.model.model)),
            Box::new(VideoFinder::new(
                client,
                &settings.model.model,
                search,
                settings.search.max_results,
            )),
        ],
        MAX_TURNS,
    )
    .with_stop_token(SENTINEL);

    let seed = Message::seed(SEED_INSTRUCTION, data_url);

    let transcript = match team.run(seed).await {
        Ok(transcript) => transcript,
        Err(e) => {
            warn!("Agent exchange failed: {}", e);
            return (format!("Agent run error: {}", e), Vec::new());
        }
    };

    info!("Exchange complete: {} transcript entries", transcript.len());

    let recipe = extract::recipe(&transcript);
    let rows = extract::video_rows(&transcript);

    (recipe, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_image_bytes_degenerate_pair() {
        let settings = Settings::default();
        let (text, rows) = analyze_image(&settings, b"not an image").await;

        assert!(text.starts_with("Error reading image:"));
        assert!(!text.is_empty());
        assert!(rows.is_empty());
    }
}
