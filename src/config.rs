//! # Game Configuration
//!
//! Tunable rules of the mini-game: grid geometry, rewards, points and every
//! timer duration. Values can be overridden from a JSON file; missing fields
//! fall back to the defaults below.

use crate::game::{Position, Question};
use crate::{StarMazeError, StarMazeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Size of one maze cell in pixels
pub const DEFAULT_CELL_SIZE: f32 = 32.0;

/// Pixels trimmed from the viewport before computing the grid size
pub const DEFAULT_MAZE_PADDING: f32 = 40.0;

/// Stars hidden per session
pub const DEFAULT_STAR_COUNT: usize = 5;

/// Dead ends this close (Manhattan) to the spawn cell never get blocks
pub const DEFAULT_DEAD_END_EXCLUSION_RADIUS: u32 = 4;

/// Answers allowed per question challenge
pub const DEFAULT_CHALLENGE_ATTEMPTS: u32 = 7;

/// Points for a solved star
pub const DEFAULT_STAR_POINTS: u32 = 10;

/// Points for a caught comet
pub const DEFAULT_COMET_POINTS: u32 = 5;

/// Comets that can be caught per session
pub const DEFAULT_COMETS_MAX: u32 = 5;

/// How often the comet spawner checks whether a comet is due
pub const DEFAULT_COMET_POLL_INTERVAL_MS: u64 = 5_000;

/// Upper bound of the random delay before the next comet
pub const DEFAULT_COMET_MAX_DELAY_MS: u64 = 10 * 60 * 1_000;

/// How long a comet stays catchable
pub const DEFAULT_COMET_FLIGHT_MS: u64 = 8_500;

/// Delay between the first move and the spawn portal disappearing
pub const DEFAULT_PORTAL_EXPIRY_MS: u64 = 10_000;

/// Extra delay before the forced spawn portal removal
pub const DEFAULT_PORTAL_FALLBACK_MS: u64 = 3_000;

/// Complete rule set for one game session.
///
/// # Examples
///
/// ```
/// use starmaze::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.star_count, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cell size in pixels
    pub cell_size: f32,
    /// Padding subtracted from the viewport before sizing the grid
    pub maze_padding: f32,
    /// Player spawn cell (clamped into the grid)
    pub spawn: Position,
    /// Number of stars to hide
    pub star_count: usize,
    /// Dead-end exclusion radius around the spawn cell
    pub dead_end_exclusion_radius: u32,
    /// Attempts per question challenge
    pub challenge_attempts: u32,
    /// Points per solved star
    pub star_points: u32,
    /// Points per caught comet
    pub comet_points: u32,
    /// Catch cap for comets
    pub comets_max: u32,
    /// Comet spawner polling interval
    pub comet_poll_interval_ms: u64,
    /// Maximum random delay between comets
    pub comet_max_delay_ms: u64,
    /// Comet flight duration
    pub comet_flight_ms: u64,
    /// Spawn portal lifetime after the first move
    pub portal_expiry_ms: u64,
    /// Delay of the forced removal after the primary expiry
    pub portal_fallback_ms: u64,
    /// Question pool for star challenges
    pub questions: Vec<Question>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            maze_padding: DEFAULT_MAZE_PADDING,
            spawn: Position::new(1, 1),
            star_count: DEFAULT_STAR_COUNT,
            dead_end_exclusion_radius: DEFAULT_DEAD_END_EXCLUSION_RADIUS,
            challenge_attempts: DEFAULT_CHALLENGE_ATTEMPTS,
            star_points: DEFAULT_STAR_POINTS,
            comet_points: DEFAULT_COMET_POINTS,
            comets_max: DEFAULT_COMETS_MAX,
            comet_poll_interval_ms: DEFAULT_COMET_POLL_INTERVAL_MS,
            comet_max_delay_ms: DEFAULT_COMET_MAX_DELAY_MS,
            comet_flight_ms: DEFAULT_COMET_FLIGHT_MS,
            portal_expiry_ms: DEFAULT_PORTAL_EXPIRY_MS,
            portal_fallback_ms: DEFAULT_PORTAL_FALLBACK_MS,
            questions: Question::default_pool(),
        }
    }
}

impl GameConfig {
    /// Loads a configuration from a JSON file and validates it.
    pub fn load(path: impl AsRef<Path>) -> StarMazeResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded game configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> StarMazeResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size >= 1.0) {
            return Err(StarMazeError::InvalidConfig(format!(
                "cell_size must be at least 1, got {}",
                self.cell_size
            )));
        }
        if !(self.maze_padding.is_finite() && self.maze_padding >= 0.0) {
            return Err(StarMazeError::InvalidConfig(format!(
                "maze_padding must be non-negative, got {}",
                self.maze_padding
            )));
        }
        if self.spawn.x < 0 || self.spawn.y < 0 {
            return Err(StarMazeError::InvalidConfig(format!(
                "spawn must not be negative, got ({}, {})",
                self.spawn.x, self.spawn.y
            )));
        }
        if self.challenge_attempts == 0 {
            return Err(StarMazeError::InvalidConfig(
                "challenge_attempts must be at least 1".to_string(),
            ));
        }
        if self.comet_poll_interval_ms == 0 {
            return Err(StarMazeError::InvalidConfig(
                "comet_poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.questions.is_empty() {
            return Err(StarMazeError::InvalidConfig(
                "question pool is empty".to_string(),
            ));
        }
        if let Some(question) = self.questions.iter().find(|q| q.answer.trim().is_empty()) {
            return Err(StarMazeError::InvalidConfig(format!(
                "question '{}' has an empty answer",
                question.prompt
            )));
        }
        Ok(())
    }

    /// Grid dimensions that fit a viewport of the given pixel size.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::GameConfig;
    ///
    /// let config = GameConfig::default();
    /// assert_eq!(config.grid_size_for_viewport(680.0, 360.0), (20, 10));
    /// assert_eq!(config.grid_size_for_viewport(10.0, 10.0), (1, 1));
    /// ```
    pub fn grid_size_for_viewport(&self, width_px: f32, height_px: f32) -> (u32, u32) {
        let cells = |px: f32| ((px - self.maze_padding) / self.cell_size).floor().max(1.0) as u32;
        (cells(width_px), cells(height_px))
    }

    pub fn comet_poll_interval(&self) -> Duration {
        Duration::from_millis(self.comet_poll_interval_ms)
    }

    pub fn comet_max_delay(&self) -> Duration {
        Duration::from_millis(self.comet_max_delay_ms)
    }

    pub fn comet_flight(&self) -> Duration {
        Duration::from_millis(self.comet_flight_ms)
    }

    pub fn portal_expiry(&self) -> Duration {
        Duration::from_millis(self.portal_expiry_ms)
    }

    pub fn portal_fallback(&self) -> Duration {
        Duration::from_millis(self.portal_fallback_ms)
    }
}
