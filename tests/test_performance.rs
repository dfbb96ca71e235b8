//! Performance tests for board generation and the per-frame game loop

use std::time::{Duration, Instant};
use starmaze::{Direction, GameConfig, GameState, GenerationConfig, StarMazeResult};

#[test]
fn test_generation_performance() -> StarMazeResult<()> {
    let config = GameConfig::default();

    // A full-HD viewport is about as large as the board gets
    let start = Instant::now();
    let iterations = 20;

    for seed in 0..iterations {
        let generation = GenerationConfig::for_viewport(&config, seed, 1920.0, 1080.0);
        let game_state = GameState::generate(config.clone(), generation)?;
        assert!(game_state.maze.width > 50);
    }

    let elapsed = start.elapsed();
    let avg_generation_time = elapsed / iterations as u32;

    println!("Average generation time: {:?}", avg_generation_time);

    // Generation happens once, behind the ready screen
    assert!(
        avg_generation_time.as_millis() < 200,
        "Generation too slow: {:?}",
        avg_generation_time
    );

    Ok(())
}

#[test]
fn test_frame_update_performance() -> StarMazeResult<()> {
    let config = GameConfig::default();
    let generation = GenerationConfig::for_viewport(&config, 12345, 1280.0, 720.0);
    let mut game_state = GameState::generate(config, generation)?;
    game_state.start(Duration::ZERO);

    // One simulated minute at 60 frames per second, with input every frame
    let start = Instant::now();
    let iterations = 3600u32;
    let directions = Direction::all();

    for frame in 0..iterations {
        let now = Duration::from_millis(u64::from(frame) * 1000 / 60);
        game_state.tick(now);
        game_state.move_player(directions[(frame % 4) as usize])?;
    }

    let elapsed = start.elapsed();
    let avg_frame_time = elapsed / iterations;

    println!("Average frame update time: {:?}", avg_frame_time);

    // Game logic must leave nearly the whole frame budget to rendering
    assert!(
        avg_frame_time.as_millis() < 2,
        "Frame updates too slow: {:?}",
        avg_frame_time
    );

    Ok(())
}
