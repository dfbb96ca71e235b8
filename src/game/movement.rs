//! # Movement Validation
//!
//! Pure checks deciding whether the player may step into a cell and which block,
//! if any, is within reach.

use crate::game::{Block, Direction, Position};
use crate::Maze;

/// Whether a step from `from` to `to` is allowed.
///
/// The target must be exactly one orthogonal step away, inside the grid, free
/// of standing blocks, and not separated from `from` by a wall.
///
/// # Examples
///
/// ```
/// use starmaze::{can_move_to, Maze, Position};
///
/// let mut maze = Maze::new_closed(3, 3);
/// let from = Position::new(1, 1);
/// assert!(!can_move_to(&maze, &[], from, Position::new(2, 1)));
///
/// maze.remove_wall_between(from, Position::new(2, 1)).unwrap();
/// assert!(can_move_to(&maze, &[], from, Position::new(2, 1)));
/// assert!(!can_move_to(&maze, &[], from, Position::new(2, 2)));
/// ```
pub fn can_move_to(maze: &Maze, blocks: &[Block], from: Position, to: Position) -> bool {
    if !maze.in_bounds(to) {
        return false;
    }
    if blocks.iter().any(|b| b.position == to) {
        return false;
    }

    match Direction::from_delta(to - from) {
        Some(direction) => !maze.has_wall(from, direction),
        None => false,
    }
}

/// Index of the first block reachable from `pos`, scanning N, E, S, W.
///
/// A block counts as reachable when it is orthogonally adjacent and no wall
/// stands between it and `pos`.
pub fn adjacent_block(maze: &Maze, blocks: &[Block], pos: Position) -> Option<usize> {
    Direction::all()
        .into_iter()
        .filter(|d| !maze.has_wall(pos, *d))
        .filter_map(|d| maze.neighbor(pos, d))
        .find_map(|target| blocks.iter().position(|b| b.position == target))
}
