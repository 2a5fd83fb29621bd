//! Analyze command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::analyze_image;
use anyhow::Result;

/// Run the analyze command.
pub async fn run_analyze(
    image: &str,
    model: Option<String>,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Analyze) {
        Output::error(&format!("{}", e));
        Output::info("Run 'dishscout doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.model.model = model;
    }

    let image_bytes = std::fs::read(image)?;

    let spinner = Output::spinner("Running the two-agent pipeline...");
    let (recipe, rows) = analyze_image(&settings, &image_bytes).await;
    spinner.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "recipe": recipe,
                "videos": rows,
            }))?
        );
        return Ok(());
    }

    Output::header("Recipe");
    if recipe.is_empty() {
        Output::warning("No recipe produced. Try another image or re-run.");
    } else {
        println!("\n{}\n", recipe);
    }

    Output::header("YouTube Results");
    if rows.is_empty() {
        Output::info("No YouTube results parsed. Try another image or re-run.");
    } else {
        for row in &rows {
            Output::video_row(row);
        }
    }
    println!();

    Ok(())
}
