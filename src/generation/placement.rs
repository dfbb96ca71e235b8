//! # Object Placement
//!
//! Places destructible blocks around the maze's dead ends and hides the
//! session's rewards behind some of them.
//!
//! Half of the eligible dead ends (rounded up) receive a block on the dead-end
//! cell plus one or two more on its open neighbours. Rewards are then drawn
//! without replacement from the whole block pool: stars first, then the ship,
//! then the exit portal. A small maze simply ends up with fewer rewards.

use crate::game::{Block, Direction, GameObjects, Position};
use crate::{GenerationConfig, Generator, Maze, StarMazeError, StarMazeResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Places blocks and hidden rewards into an already carved maze.
#[derive(Debug, Clone)]
pub struct ObjectPlacer<'a> {
    maze: &'a Maze,
}

impl<'a> ObjectPlacer<'a> {
    pub fn new(maze: &'a Maze) -> Self {
        Self { maze }
    }

    /// Dead ends eligible for blocks.
    pub fn find_dead_ends(&self, config: &GenerationConfig) -> Vec<Position> {
        self.maze
            .dead_ends(config.spawn_cell(), config.dead_end_exclusion_radius)
    }

    /// Puts blocks on a random half of the dead ends and next to them.
    pub fn place_blocks(&self, config: &GenerationConfig, rng: &mut StdRng) -> Vec<Block> {
        let mut dead_ends = self.find_dead_ends(config);
        let selected_count = (dead_ends.len() + 1) / 2;
        dead_ends.shuffle(rng);
        dead_ends.truncate(selected_count);

        let mut occupied: HashSet<Position> = HashSet::new();
        let mut blocks = Vec::new();

        for dead_end in dead_ends {
            if occupied.insert(dead_end) {
                blocks.push(Block::new(dead_end));
            }

            let mut candidates: Vec<Position> = Direction::all()
                .into_iter()
                .filter(|d| !self.maze.has_wall(dead_end, *d))
                .filter_map(|d| self.maze.neighbor(dead_end, d))
                .filter(|pos| !occupied.contains(pos))
                .collect();

            let extra = rng.gen_range(1..=2).min(candidates.len());
            for _ in 0..extra {
                let pos = candidates.swap_remove(rng.gen_range(0..candidates.len()));
                occupied.insert(pos);
                blocks.push(Block::new(pos));
            }
        }

        debug!("Placed {} blocks around {} dead ends", blocks.len(), selected_count);
        blocks
    }

    /// Hides stars, the ship and the exit portal behind distinct blocks.
    pub fn hide_items(
        &self,
        objects: &mut GameObjects,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> StarMazeResult<()> {
        let mut available: Vec<usize> = (0..objects.blocks.len()).collect();
        let mut draw = |rng: &mut StdRng| -> Option<usize> {
            if available.is_empty() {
                None
            } else {
                Some(available.swap_remove(rng.gen_range(0..available.len())))
            }
        };

        for _ in 0..config.star_count {
            match draw(rng) {
                Some(index) => objects.hide_star(index)?,
                None => break,
            }
        }
        if let Some(index) = draw(rng) {
            objects.hide_ship(index)?;
        }
        if let Some(index) = draw(rng) {
            objects.hide_portal(index)?;
        }

        let expected = config.star_count + 2;
        if objects.hidden_item_count() < expected {
            warn!(
                "Only {} blocks available, placed {} of {} rewards",
                objects.blocks.len(),
                objects.hidden_item_count(),
                expected
            );
        }
        Ok(())
    }
}

impl Generator<GameObjects> for ObjectPlacer<'_> {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> StarMazeResult<GameObjects> {
        let mut objects = GameObjects::new(config.spawn_cell());
        objects.blocks = self.place_blocks(config, rng);
        self.hide_items(&mut objects, config, rng)?;
        self.validate(&objects, config)?;

        info!(
            "Placed {} blocks hiding {} stars, ship: {}, portal: {}",
            objects.blocks.len(),
            objects.stars.len(),
            objects.ship.is_some(),
            objects.portal.is_some()
        );
        Ok(objects)
    }

    fn validate(&self, content: &GameObjects, config: &GenerationConfig) -> StarMazeResult<()> {
        let mut seen = HashSet::new();
        for block in &content.blocks {
            if !self.maze.in_bounds(block.position) {
                return Err(StarMazeError::GenerationFailed(format!(
                    "block at {:?} is outside the maze",
                    block.position
                )));
            }
            if !seen.insert(block.position) {
                return Err(StarMazeError::GenerationFailed(format!(
                    "two blocks share cell {:?}",
                    block.position
                )));
            }
        }
        if content.has_block_at(config.spawn_cell()) {
            return Err(StarMazeError::GenerationFailed(
                "spawn cell is blocked".to_string(),
            ));
        }
        if content.stars.len() > config.star_count {
            return Err(StarMazeError::GenerationFailed(format!(
                "{} stars placed, at most {} allowed",
                content.stars.len(),
                config.star_count
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DeadEndPlacer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::HiddenItem;
    use crate::generation::utils::create_rng;
    use crate::MazeGenerator;

    fn generate(seed: u64, width: u32, height: u32) -> (Maze, GameObjects) {
        let config = GenerationConfig::new(seed, width, height);
        let mut rng = create_rng(&config);
        let maze = MazeGenerator::new().generate(&config, &mut rng).unwrap();
        let objects = ObjectPlacer::new(&maze).generate(&config, &mut rng).unwrap();
        (maze, objects)
    }

    #[test]
    fn test_full_reward_set_on_large_maze() {
        let (_, objects) = generate(12345, 30, 20);
        assert!(objects.blocks.len() >= 7);
        assert_eq!(objects.stars.len(), 5);
        assert!(objects.ship.is_some());
        assert!(objects.portal.is_some());
        assert_eq!(objects.hidden_item_count(), 7);
        assert!(objects.stars.iter().all(|s| s.hidden && !s.solved));
    }

    #[test]
    fn test_each_block_hides_at_most_one_item() {
        let (_, objects) = generate(777, 25, 18);
        let mut items = HashSet::new();
        for block in &objects.blocks {
            if let Some(item) = block.hidden_item {
                assert!(items.insert(item));
                assert_eq!(objects.item_position(item), Some(block.position));
            }
        }
    }

    #[test]
    fn test_dead_end_blocks_and_neighbours() {
        let (maze, objects) = generate(2024, 20, 20);
        let config = GenerationConfig::new(2024, 20, 20);
        let dead_ends: HashSet<Position> = ObjectPlacer::new(&maze)
            .find_dead_ends(&config)
            .into_iter()
            .collect();

        for block in &objects.blocks {
            let on_dead_end = dead_ends.contains(&block.position);
            let beside_dead_end = maze
                .open_neighbors(block.position)
                .iter()
                .any(|n| dead_ends.contains(n));
            assert!(on_dead_end || beside_dead_end);
        }

        let dead_end_blocks = objects
            .blocks
            .iter()
            .filter(|b| dead_ends.contains(&b.position))
            .count();
        assert!(dead_end_blocks >= (dead_ends.len() + 1) / 2);
    }

    #[test]
    fn test_small_maze_places_fewer_rewards() {
        let (_, objects) = generate(5, 3, 3);
        // Every cell of a 3x3 grid is within distance 4 of (1, 1)
        assert!(objects.blocks.is_empty());
        assert!(objects.stars.is_empty());
        assert!(objects.ship.is_none());
        assert!(objects.portal.is_none());
        assert_eq!(objects.spawn_portal, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_hide_items_with_short_pool() {
        let maze = Maze::new_closed(10, 10);
        let config = GenerationConfig::new(3, 10, 10);
        let mut rng = create_rng(&config);
        let mut objects = GameObjects::new(config.spawn_cell());
        for x in 0..4 {
            objects.blocks.push(Block::new(Position::new(x, 9)));
        }

        ObjectPlacer::new(&maze)
            .hide_items(&mut objects, &config, &mut rng)
            .unwrap();
        assert_eq!(objects.stars.len(), 4);
        assert!(objects.ship.is_none());
        assert!(objects.portal.is_none());
        assert!(objects
            .blocks
            .iter()
            .all(|b| matches!(b.hidden_item, Some(HiddenItem::Star(_)))));
    }
}
