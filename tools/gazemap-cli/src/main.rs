//! GazeMap CLI: command-line interface for replaying and analyzing gaze data.
//!
//! Usage:
//!   gazemap replay <PATH>      Run a recorded stream through the engine on its own timestamps
//!   gazemap play <PATH>        Play a recorded stream through a live session in real time
//!   gazemap analyze <PATH>     Region analysis of a snapshot
//!   gazemap config             Show or write the default configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gazemap_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "gazemap",
    about = "Gaze heatmap accumulation and attention analysis",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/gazemap/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded sample stream through the engine (virtual clock)
    Replay {
        /// Path to a samples JSONL file
        path: PathBuf,

        /// Viewport width used for analysis (defaults to the stream header)
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height used for analysis (defaults to the stream header)
        #[arg(long)]
        height: Option<f64>,

        /// Write the terminal snapshot to this path
        #[arg(long)]
        snapshot_out: Option<PathBuf>,

        /// Print the final render frame and report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a recorded stream through a live tracking session
    Play {
        /// Path to a samples JSONL file
        path: PathBuf,

        /// Playback speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Viewport width used for analysis (defaults to the stream header)
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height used for analysis (defaults to the stream header)
        #[arg(long)]
        height: Option<f64>,
    },

    /// Run region analysis on a snapshot
    Analyze {
        /// Path to a snapshot JSONL file
        path: PathBuf,

        /// Viewport width (defaults to the snapshot header)
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height (defaults to the snapshot header)
        #[arg(long)]
        height: Option<f64>,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the standard config location
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    gazemap_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay {
            path,
            width,
            height,
            snapshot_out,
            json,
        } => commands::replay::run(&config, path, width, height, snapshot_out, json),
        Commands::Play {
            path,
            speed,
            width,
            height,
        } => commands::play::run(&config, path, speed, width, height).await,
        Commands::Analyze {
            path,
            width,
            height,
            json,
        } => commands::analyze::run(&config, path, width, height, json),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
