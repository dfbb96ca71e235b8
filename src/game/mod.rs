//! # Game Module
//!
//! Session state and rules of the maze mini-game.
//!
//! This module contains the building blocks of a play session:
//! - Grid coordinates and the four movement directions
//! - Blocks and the rewards hidden behind them
//! - The movement validator
//! - Question challenges guarding the stars
//! - The timer scheduler and the comet system built on it
//! - The session controller tying it all together

pub mod challenge;
pub mod cheats;
pub mod comets;
pub mod movement;
pub mod objects;
pub mod state;
pub mod timers;

pub use challenge::*;
pub use cheats::*;
pub use comets::*;
pub use movement::*;
pub use objects::*;
pub use state::*;
pub use timers::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a cell coordinate in the maze grid.
///
/// # Examples
///
/// ```
/// use starmaze::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The four movement directions. Each maps to one wall side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::East => Position::new(1, 0),
            Direction::South => Position::new(0, 1),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None unless the delta is exactly one orthogonal step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// The direction pointing back.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Returns all 4 directions in wall order: top, right, bottom, left.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }
}

/// Unique identifier for comets.
pub type CometId = Uuid;

/// Creates a new unique comet ID.
pub fn new_comet_id() -> CometId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
        assert_eq!(Position::origin(), Position::new(0, 0));
    }

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(1, 1);
        let pos2 = Position::new(4, 3);
        assert_eq!(pos1.manhattan_distance(pos2), 5);
        assert_eq!(pos2.manhattan_distance(pos1), 5);
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_direction_round_trip_and_opposite() {
        for direction in Direction::all() {
            assert_eq!(Direction::from_delta(direction.to_delta()), Some(direction));
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.to_delta() + direction.opposite().to_delta(), Position::origin());
        }
        assert_eq!(Direction::from_delta(Position::new(1, 1)), None);
        assert_eq!(Direction::from_delta(Position::new(2, 0)), None);
    }

    #[test]
    fn test_comet_id_uniqueness() {
        assert_ne!(new_comet_id(), new_comet_id());
    }
}
