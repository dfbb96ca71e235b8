//! Property tests over randomly seeded boards.

use proptest::prelude::*;
use starmaze::generation::utils::create_rng;
use starmaze::{
    can_move_to, Direction, GenerationConfig, Generator, Maze, MazeGenerator, ObjectPlacer,
    Position,
};
use std::collections::HashSet;

fn generate(seed: u64, width: u32, height: u32) -> (GenerationConfig, Maze, starmaze::GameObjects) {
    let config = GenerationConfig::new(seed, width, height);
    let mut rng = create_rng(&config);
    let maze = MazeGenerator::new().generate(&config, &mut rng).unwrap();
    let objects = ObjectPlacer::new(&maze).generate(&config, &mut rng).unwrap();
    (config, maze, objects)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generated_maze_is_perfect(seed in any::<u64>(), width in 1u32..30, height in 1u32..30) {
        let (_, maze, _) = generate(seed, width, height);
        prop_assert_eq!(maze.removed_wall_pairs(), (width * height - 1) as usize);
        prop_assert!(maze.walls_are_symmetric());
        prop_assert!(maze.is_fully_connected());
    }

    #[test]
    fn prop_movement_matches_walls(
        seed in any::<u64>(),
        width in 2u32..20,
        height in 2u32..20,
        x in 0i32..20,
        y in 0i32..20,
        direction in arb_direction(),
    ) {
        let (_, maze, _) = generate(seed, width, height);
        let from = Position::new(x % width as i32, y % height as i32);
        let to = from.step(direction);
        let expected = maze.in_bounds(to) && !maze.has_wall(from, direction);
        prop_assert_eq!(can_move_to(&maze, &[], from, to), expected);

        // Moves are symmetric
        if expected {
            prop_assert!(can_move_to(&maze, &[], to, from));
        }
    }

    #[test]
    fn prop_rewards_are_well_formed(seed in any::<u64>(), width in 3u32..40, height in 3u32..30) {
        let (config, maze, objects) = generate(seed, width, height);
        let spawn = config.spawn_cell();

        prop_assert!(objects.stars.len() <= 5);
        if objects.portal.is_some() {
            prop_assert!(objects.ship.is_some());
        }
        if objects.ship.is_some() {
            prop_assert_eq!(objects.stars.len(), 5);
        }

        let cells: HashSet<Position> = objects.blocks.iter().map(|b| b.position).collect();
        prop_assert_eq!(cells.len(), objects.blocks.len());
        prop_assert!(!cells.contains(&spawn));
        prop_assert!(cells.iter().all(|pos| maze.in_bounds(*pos)));

        // Every reward sits on its own block, and nothing starts visible
        let hidden = objects.stars.len()
            + usize::from(objects.ship.is_some())
            + usize::from(objects.portal.is_some());
        prop_assert_eq!(objects.hidden_item_count(), hidden);
        if objects.blocks.len() >= 7 {
            prop_assert_eq!(hidden, 7);
        } else {
            prop_assert_eq!(hidden, objects.blocks.len());
        }
        prop_assert!(objects.stars.iter().all(|s| s.hidden && !s.solved));
        prop_assert!(objects.stars.iter().all(|s| cells.contains(&s.position)));
    }

    #[test]
    fn prop_blocks_surround_distant_dead_ends(seed in any::<u64>(), width in 5u32..30, height in 5u32..30) {
        let (config, maze, objects) = generate(seed, width, height);
        let dead_ends = maze.dead_ends(config.spawn_cell(), config.dead_end_exclusion_radius);
        let selected = (dead_ends.len() + 1) / 2;

        prop_assert!(dead_ends
            .iter()
            .all(|d| d.manhattan_distance(config.spawn_cell()) > config.dead_end_exclusion_radius));
        prop_assert!(objects.blocks.len() >= selected);
        prop_assert!(objects.blocks.len() <= selected * 2);
    }
}
