//! # Maze Generation
//!
//! Grid-of-cells maze representation and the recursive backtracker that carves it.
//!
//! Every cell starts with all four walls standing. Carving removes the wall pair
//! shared by two neighbouring cells, so the two sides always agree. A finished
//! maze is perfect: a spanning tree over the grid with exactly one path between
//! any two cells.

use crate::game::{Direction, Position};
use crate::{GenerationConfig, Generator, StarMazeError, StarMazeResult};
use log::{debug, info};
use pathfinding::prelude::bfs_reach;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The four wall flags of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    /// All four walls standing.
    pub fn closed() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }

    /// Whether the wall on the side facing `direction` is standing.
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.top,
            Direction::East => self.right,
            Direction::South => self.bottom,
            Direction::West => self.left,
        }
    }

    fn set(&mut self, direction: Direction, standing: bool) {
        match direction {
            Direction::North => self.top = standing,
            Direction::East => self.right = standing,
            Direction::South => self.bottom = standing,
            Direction::West => self.left = standing,
        }
    }

    /// Number of sides without a wall.
    pub fn open_count(&self) -> usize {
        Direction::all().iter().filter(|d| !self.has(**d)).count()
    }
}

/// A single maze cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub walls: Walls,
    /// Only meaningful while carving
    pub visited: bool,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            walls: Walls::closed(),
            visited: false,
        }
    }

    /// A dead end has exactly one open side.
    pub fn is_dead_end(&self) -> bool {
        self.walls.open_count() == 1
    }
}

/// Rectangular maze grid stored row-major (`cells[y][x]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Vec<Cell>>,
}

impl Maze {
    /// Creates a grid with every wall standing.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{Maze, Position};
    ///
    /// let maze = Maze::new_closed(4, 3);
    /// assert_eq!(maze.width, 4);
    /// assert!(maze.in_bounds(Position::new(3, 2)));
    /// assert!(!maze.in_bounds(Position::new(4, 0)));
    /// assert_eq!(maze.removed_wall_pairs(), 0);
    /// ```
    pub fn new_closed(width: u32, height: u32) -> Self {
        let cells = (0..height as i32)
            .map(|y| {
                (0..width as i32)
                    .map(|x| Cell::new(Position::new(x, y)))
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if self.in_bounds(pos) {
            Some(&self.cells[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            Some(&mut self.cells[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Iterates over all cells row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|row| row.iter())
    }

    /// Whether a wall stands on the `direction` side of `pos`.
    ///
    /// Positions outside the grid count as walled in every direction.
    pub fn has_wall(&self, pos: Position, direction: Direction) -> bool {
        self.cell(pos).map_or(true, |cell| cell.walls.has(direction))
    }

    /// The in-bounds neighbour of `pos` in `direction`.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let next = pos.step(direction);
        self.in_bounds(next).then_some(next)
    }

    /// Neighbours reachable from `pos` without crossing a wall.
    pub fn open_neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .filter(|d| !self.has_wall(pos, *d))
            .filter_map(|d| self.neighbor(pos, d))
            .collect()
    }

    /// Removes the wall pair between two orthogonally adjacent cells.
    pub fn remove_wall_between(&mut self, a: Position, b: Position) -> StarMazeResult<()> {
        let direction = Direction::from_delta(b - a).ok_or_else(|| {
            StarMazeError::InvalidAction(format!("cells {:?} and {:?} are not adjacent", a, b))
        })?;
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return Err(StarMazeError::InvalidAction(format!(
                "wall between {:?} and {:?} is outside the grid",
                a, b
            )));
        }

        self.cells[a.y as usize][a.x as usize]
            .walls
            .set(direction, false);
        self.cells[b.y as usize][b.x as usize]
            .walls
            .set(direction.opposite(), false);
        Ok(())
    }

    /// Number of carved passages, counting each shared wall pair once.
    pub fn removed_wall_pairs(&self) -> usize {
        self.iter_cells()
            .map(|cell| {
                let right = !cell.walls.right && self.neighbor(cell.position, Direction::East).is_some();
                let bottom = !cell.walls.bottom && self.neighbor(cell.position, Direction::South).is_some();
                right as usize + bottom as usize
            })
            .sum()
    }

    /// Whether every pair of adjacent cells agrees on the wall between them.
    pub fn walls_are_symmetric(&self) -> bool {
        self.iter_cells().all(|cell| {
            Direction::all().into_iter().all(|direction| {
                match self.neighbor(cell.position, direction) {
                    Some(other) => {
                        cell.walls.has(direction) == self.has_wall(other, direction.opposite())
                    }
                    None => true,
                }
            })
        })
    }

    /// Whether every cell can be reached from (0, 0).
    pub fn is_fully_connected(&self) -> bool {
        bfs_reach(Position::origin(), |pos| self.open_neighbors(*pos)).count()
            == (self.width * self.height) as usize
    }

    /// Perfect maze check: connected and acyclic.
    pub fn is_perfect(&self) -> bool {
        self.removed_wall_pairs() + 1 == (self.width * self.height) as usize
            && self.walls_are_symmetric()
            && self.is_fully_connected()
    }

    /// All dead-end cells further than `radius` (Manhattan) from `origin`.
    pub fn dead_ends(&self, origin: Position, radius: u32) -> Vec<Position> {
        self.iter_cells()
            .filter(|cell| cell.is_dead_end() && cell.position.manhattan_distance(origin) > radius)
            .map(|cell| cell.position)
            .collect()
    }
}

/// Iterative randomized depth-first carver (recursive backtracker).
#[derive(Debug, Clone, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Carves passages from `start` until every reachable cell is visited.
    fn carve(&self, maze: &mut Maze, start: Position, rng: &mut StdRng) -> StarMazeResult<()> {
        let start_cell = maze
            .cell_mut(start)
            .ok_or_else(|| StarMazeError::GenerationFailed(format!("start {:?} outside grid", start)))?;
        start_cell.visited = true;

        let mut stack = vec![start];
        while let Some(&current) = stack.last() {
            let unvisited: Vec<Position> = Direction::all()
                .into_iter()
                .filter_map(|d| maze.neighbor(current, d))
                .filter(|pos| maze.cell(*pos).map_or(false, |c| !c.visited))
                .collect();

            if unvisited.is_empty() {
                stack.pop();
                continue;
            }

            let next = unvisited[rng.gen_range(0..unvisited.len())];
            maze.remove_wall_between(current, next)?;
            if let Some(cell) = maze.cell_mut(next) {
                cell.visited = true;
            }
            stack.push(next);
        }

        Ok(())
    }
}

impl Generator<Maze> for MazeGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> StarMazeResult<Maze> {
        if config.width == 0 || config.height == 0 {
            return Err(StarMazeError::GenerationFailed(format!(
                "grid {}x{} has no cells",
                config.width, config.height
            )));
        }

        info!("Generating {}x{} maze", config.width, config.height);
        let mut maze = Maze::new_closed(config.width, config.height);
        self.carve(&mut maze, Position::origin(), rng)?;
        self.validate(&maze, config)?;
        debug!("Maze carved with {} passages", maze.removed_wall_pairs());
        Ok(maze)
    }

    fn validate(&self, content: &Maze, config: &GenerationConfig) -> StarMazeResult<()> {
        if content.width != config.width || content.height != config.height {
            return Err(StarMazeError::GenerationFailed(format!(
                "maze is {}x{}, expected {}x{}",
                content.width, content.height, config.width, config.height
            )));
        }
        if !content.is_perfect() {
            return Err(StarMazeError::GenerationFailed(
                "carved maze is not a spanning tree".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RecursiveBacktracker"
    }
}
