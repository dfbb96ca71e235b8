//! # Star Maze
//!
//! A maze mini-game used as the gamification layer of a tutoring site.
//!
//! ## Architecture Overview
//!
//! The crate keeps game rules apart from presentation so the whole game can be
//! driven headlessly in tests:
//!
//! - **Generation**: recursive-backtracker maze carving, dead-end detection and
//!   placement of destructible blocks that hide stars, a ship and an exit portal
//! - **Game State**: the single session controller. Movement, the context
//!   sensitive action, question challenges, the win condition and every timer
//!   live here and report what happened as [`GameEvent`]s
//! - **Timers**: a single-threaded min-heap scheduler advanced by
//!   [`GameState::tick`], driving comets and the spawn portal expiry
//! - **Rendering / Input / Scenes**: a macroquad front end that observes the
//!   state and feeds keyboard and pointer input back into it
//! - **Schedule**: the weekly lesson schedule document shown next to the game

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;
pub mod schedule;

// Core module re-exports
pub use config::GameConfig;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use schedule::*;

pub use game::{
    // From challenge
    AnswerOutcome,
    Challenge,
    Question,
    // From comets
    Comet,
    CometDirection,
    CometSystem,
    Direction,
    // From state
    GameCompletionState,
    GameEvent,
    GameState,
    // From objects
    Block,
    BlockHit,
    GameObjects,
    HiddenItem,
    Portal,
    Position,
    SessionStats,
    Ship,
    Star,
    // From timers
    Scheduler,
    TimerHandle,
    TimerKind,
};

pub use generation::{Cell, GenerationConfig, Generator, Maze, MazeGenerator, ObjectPlacer, Walls};

pub use rendering::MacroquadDisplay;
pub use scenes::SceneManager;

/// Core error type for the Star Maze game.
#[derive(thiserror::Error, Debug)]
pub enum StarMazeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Schedule document could not be used
    #[error("Schedule error: {0}")]
    Schedule(String),
}

/// Result type used throughout the Star Maze codebase.
pub type StarMazeResult<T> = Result<T, StarMazeError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
