//! # Star Maze Main Entry Point
//!
//! Parses the command line, sets up logging, generates a board sized to the
//! window and hands control to the scene manager.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use starmaze::{
    GameConfig, GameState, GenerationConfig, InputHandler, SceneManager, ScheduleRequest,
    ScheduleSource, StarMazeResult,
};
use std::path::PathBuf;

/// Command line arguments for Star Maze.
#[derive(Parser, Debug)]
#[command(name = "starmaze")]
#[command(about = "A maze mini-game with hidden stars, quiz challenges and comets")]
#[command(version)]
struct Args {
    /// Random seed for maze generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable development mode with cheat keys
    #[arg(long)]
    dev_mode: bool,

    /// JSON file overriding the game configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Saved weekly schedule document to show on the title screen
    #[arg(long)]
    schedule: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Star Maze".to_string(),
        window_width: 1024,
        window_height: 768,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> StarMazeResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Star Maze v{}", starmaze::VERSION);

    if let Err(e) = run_game(&args).await {
        error!("Game aborted: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp_millis()
            .init();
    }
}

async fn run_game(args: &Args) -> StarMazeResult<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(::rand::random);
    info!("Generating maze with seed: {}", seed);

    // Give the window a frame to settle on its real size
    next_frame().await;
    let generation = GenerationConfig::for_viewport(&config, seed, screen_width(), screen_height());
    let game_state = GameState::generate(config, generation)?;

    let schedule = match &args.schedule {
        Some(path) => Some(ScheduleSource::load(path, ScheduleRequest::today())),
        None => None,
    };

    let input_handler = InputHandler::new(args.dev_mode);
    if args.dev_mode {
        info!("Dev mode: F2 reveal, F3 teleport, F4 ship, F5 stars, F6 comet");
    }

    let mut scenes = SceneManager::new(game_state, input_handler, schedule);
    scenes.run().await
}
