//! # Generation Module
//!
//! Procedural content generation for a play session: the maze itself and the
//! blocks, stars, ship and exit portal placed in it.
//!
//! Generation is deterministic for a given seed, so tests and bug reports can
//! reproduce a board exactly.

pub mod maze;
pub mod placement;

pub use maze::*;
pub use placement::*;

use crate::game::Position;
use crate::{GameConfig, StarMazeResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Requested player spawn cell (clamped into the grid)
    pub spawn: Position,
    /// Dead ends within this Manhattan distance of spawn stay empty
    pub dead_end_exclusion_radius: u32,
    /// Stars to hide behind blocks
    pub star_count: usize,
}

impl GenerationConfig {
    /// Creates a configuration with the default placement rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{GenerationConfig, Position};
    ///
    /// let config = GenerationConfig::new(42, 20, 15);
    /// assert_eq!(config.star_count, 5);
    /// assert_eq!(config.spawn_cell(), Position::new(1, 1));
    /// ```
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            spawn: Position::new(1, 1),
            dead_end_exclusion_radius: crate::config::DEFAULT_DEAD_END_EXCLUSION_RADIUS,
            star_count: crate::config::DEFAULT_STAR_COUNT,
        }
    }

    /// Creates a configuration for a grid of the given size using the game rules.
    pub fn from_game_config(config: &GameConfig, seed: u64, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            spawn: config.spawn,
            dead_end_exclusion_radius: config.dead_end_exclusion_radius,
            star_count: config.star_count,
        }
    }

    /// Creates a configuration sized to fit a pixel viewport.
    pub fn for_viewport(config: &GameConfig, seed: u64, width_px: f32, height_px: f32) -> Self {
        let (width, height) = config.grid_size_for_viewport(width_px, height_px);
        Self::from_game_config(config, seed, width, height)
    }

    /// Spawn cell clamped into the grid.
    pub fn spawn_cell(&self) -> Position {
        Position::new(
            self.spawn.x.clamp(0, self.width.saturating_sub(1) as i32),
            self.spawn.y.clamp(0, self.height.saturating_sub(1) as i32),
        )
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42, 20, 15)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> StarMazeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> StarMazeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345, 30, 20);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.width, 30);
        assert_eq!(config.dead_end_exclusion_radius, 4);
    }

    #[test]
    fn test_spawn_cell_is_clamped() {
        let config = GenerationConfig::new(1, 1, 1);
        assert_eq!(config.spawn_cell(), Position::new(0, 0));

        let config = GenerationConfig::new(1, 5, 1);
        assert_eq!(config.spawn_cell(), Position::new(1, 0));
    }

    #[test]
    fn test_for_viewport_uses_game_rules() {
        let mut game_config = GameConfig::default();
        game_config.star_count = 3;
        let config = GenerationConfig::for_viewport(&game_config, 9, 680.0, 360.0);
        assert_eq!((config.width, config.height), (20, 10));
        assert_eq!(config.star_count, 3);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_utils_rng_creation() {
        use rand::Rng;

        let config = GenerationConfig::new(12345, 5, 5);
        let mut a = utils::create_rng(&config);
        let mut b = utils::create_rng(&config);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
