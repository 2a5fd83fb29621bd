//! CLI module for Dishscout.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Dishscout - dish identification and recipe discovery
///
/// Point it at a food photo: it identifies the dish, writes a recipe,
/// and finds related YouTube videos.
#[derive(Parser, Debug)]
#[command(name = "dishscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a food photo: recipe + YouTube results
    Analyze {
        /// Path to the image file (JPEG/PNG/WebP)
        image: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Print the result pair as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
