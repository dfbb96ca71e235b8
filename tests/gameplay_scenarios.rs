//! End-to-end play sessions driven through the public `GameState` API.

use std::time::Duration;
use starmaze::{
    Block, Direction, GameConfig, GameEvent, GameObjects, GameState, HiddenItem, Maze, Position,
    StarMazeResult,
};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Fully open corridor `width` cells long.
fn corridor(width: u32) -> Maze {
    let mut maze = Maze::new_closed(width, 1);
    for x in 0..width as i32 - 1 {
        maze.remove_wall_between(Position::new(x, 0), Position::new(x + 1, 0))
            .unwrap();
    }
    maze
}

/// Stars on cells 1..=5, ship on 6, exit portal on 7, all already uncovered.
fn open_board() -> GameState {
    let mut objects = GameObjects::new(Position::origin());
    for x in 1..=7 {
        objects.blocks.push(Block::new(Position::new(x, 0)));
    }
    for index in 0..5 {
        objects.hide_star(index).unwrap();
    }
    objects.hide_ship(5).unwrap();
    objects.hide_portal(6).unwrap();
    for index in 0..5 {
        objects.reveal(HiddenItem::Star(index));
    }
    objects.reveal(HiddenItem::Ship);
    objects.reveal(HiddenItem::Portal);
    objects.blocks.clear();

    let mut game =
        GameState::from_layout(GameConfig::default(), corridor(8), objects, Position::origin(), 1)
            .unwrap();
    game.start(Duration::ZERO);
    game
}

fn walk_to(game: &mut GameState, x: i32) -> StarMazeResult<()> {
    for _ in 0..16 {
        let direction = match game.player.x.cmp(&x) {
            std::cmp::Ordering::Less => Direction::East,
            std::cmp::Ordering::Greater => Direction::West,
            std::cmp::Ordering::Equal => break,
        };
        game.move_player(direction)?;
    }
    assert_eq!(game.player.x, x);
    Ok(())
}

fn solve_star_here(game: &mut GameState) -> StarMazeResult<Vec<GameEvent>> {
    let events = game.perform_action()?;
    assert!(matches!(events[0], GameEvent::ChallengeOpened { .. }));
    let answer = game
        .challenge
        .as_ref()
        .map(|c| c.question.answer.clone())
        .unwrap_or_default();
    game.submit_answer(&answer)
}

#[test]
fn test_portal_needs_every_star() -> StarMazeResult<()> {
    let mut game = open_board();
    for x in 1..=4 {
        walk_to(&mut game, x)?;
        solve_star_here(&mut game)?;
    }
    walk_to(&mut game, 6)?;
    assert!(matches!(
        game.perform_action()?[0],
        GameEvent::ShipCollected { .. }
    ));

    walk_to(&mut game, 7)?;
    assert_eq!(
        game.perform_action()?,
        vec![GameEvent::PortalLocked {
            stars_remaining: 1,
            needs_ship: false
        }]
    );
    assert!(!game.is_completed());

    walk_to(&mut game, 5)?;
    solve_star_here(&mut game)?;
    walk_to(&mut game, 7)?;
    assert_eq!(
        game.perform_action()?,
        vec![GameEvent::GameCompleted { score: 50 }]
    );
    assert!(game.is_completed());
    assert_eq!(game.session.stars_found, 5);
    Ok(())
}

#[test]
fn test_portal_needs_ship() -> StarMazeResult<()> {
    let mut game = open_board();
    for x in 1..=5 {
        walk_to(&mut game, x)?;
        solve_star_here(&mut game)?;
    }
    walk_to(&mut game, 7)?;
    assert_eq!(
        game.perform_action()?,
        vec![GameEvent::PortalLocked {
            stars_remaining: 0,
            needs_ship: true
        }]
    );
    Ok(())
}

#[test]
fn test_seven_wrong_answers_close_the_challenge() -> StarMazeResult<()> {
    let mut game = open_board();
    walk_to(&mut game, 1)?;
    game.perform_action()?;

    for left in (1..7).rev() {
        assert_eq!(
            game.submit_answer("definitely wrong")?,
            vec![GameEvent::WrongAnswer { attempts_left: left }]
        );
    }
    assert_eq!(
        game.submit_answer("definitely wrong")?,
        vec![GameEvent::ChallengeFailed { star: 0 }]
    );

    assert!(game.challenge.is_none());
    let star = &game.objects.stars[0];
    assert!(!star.solved);
    assert!(!star.hidden);
    assert_eq!(game.session.score, 0);

    // The star can be attempted again with a fresh set of attempts
    let events = game.perform_action()?;
    assert!(matches!(
        events[0],
        GameEvent::ChallengeOpened { star: 0, attempts: 7, .. }
    ));
    Ok(())
}

#[test]
fn test_empty_answers_are_free() -> StarMazeResult<()> {
    let mut game = open_board();
    walk_to(&mut game, 1)?;
    game.perform_action()?;
    for _ in 0..20 {
        assert_eq!(game.submit_answer("   ")?, vec![GameEvent::AnswerRejected]);
    }
    assert_eq!(game.challenge.as_ref().map(|c| c.attempts_left), Some(7));

    assert_eq!(game.skip_challenge(), vec![GameEvent::ChallengeSkipped { star: 0 }]);
    assert!(!game.objects.stars[0].solved);
    Ok(())
}

#[test]
fn test_block_takes_two_hits_and_reveals() -> StarMazeResult<()> {
    let mut objects = GameObjects::new(Position::origin());
    objects.blocks.push(Block::new(Position::new(1, 0)));
    objects.hide_ship(0)?;
    let mut game =
        GameState::from_layout(GameConfig::default(), corridor(3), objects, Position::origin(), 5)?;
    game.start(Duration::ZERO);

    assert!(!game.can_move_to(Position::new(1, 0)));
    assert_eq!(
        game.perform_action()?,
        vec![GameEvent::BlockCracked {
            position: Position::new(1, 0)
        }]
    );
    assert!(game.objects.blocks[0].is_cracked());
    assert!(!game.can_move_to(Position::new(1, 0)));

    game.perform_action()?;
    assert!(game.objects.blocks.is_empty());
    assert!(game.can_move_to(Position::new(1, 0)));
    assert_eq!(game.objects.ship.as_ref().map(|s| s.hidden), Some(false));

    game.move_player(Direction::East)?;
    game.perform_action()?;
    assert!(game.session.has_ship);
    Ok(())
}

#[test]
fn test_block_beats_star_underfoot() -> StarMazeResult<()> {
    let mut game = open_board();
    walk_to(&mut game, 1)?;
    game.objects.blocks.push(Block::new(Position::new(2, 0)));

    let events = game.perform_action()?;
    assert_eq!(
        events,
        vec![GameEvent::BlockCracked {
            position: Position::new(2, 0)
        }]
    );
    assert!(game.challenge.is_none());
    Ok(())
}

#[test]
fn test_comet_catches_are_capped() {
    let mut game = open_board();
    let mut launched_after_cap = 0;

    // Comets launch at most ten minutes apart, so five fit well inside four hours
    for second in 1..=4 * 3600 {
        for event in game.tick(secs(second)) {
            if let GameEvent::CometLaunched { id, .. } = event {
                if game.session.comets_caught >= 5 {
                    launched_after_cap += 1;
                }
                game.catch_comet(id);
            }
        }
    }

    assert_eq!(game.session.comets_caught, 5);
    assert_eq!(game.session.score, 25);
    assert_eq!(launched_after_cap, 0);
    assert!(!game.comets.is_running());
}

#[test]
fn test_uncaught_comet_expires() {
    let mut game = open_board();
    game.tick(secs(1));
    let id = match game.spawn_comet().first() {
        Some(GameEvent::CometLaunched { id, .. }) => *id,
        other => panic!("expected a launch, got {:?}", other),
    };

    game.tick(Duration::from_millis(9_400));
    assert!(game.comets.get(id).is_some());
    let events = game.tick(Duration::from_millis(9_500));
    assert!(events.contains(&GameEvent::CometExpired { id }));
    assert!(game.comets.get(id).is_none());

    assert!(game.catch_comet(id).is_empty());
    assert_eq!(game.session.comets_caught, 0);
}

#[test]
fn test_completion_freezes_the_session() -> StarMazeResult<()> {
    let mut game = open_board();
    for x in 1..=5 {
        walk_to(&mut game, x)?;
        solve_star_here(&mut game)?;
    }
    walk_to(&mut game, 6)?;
    game.perform_action()?;
    game.spawn_comet();
    let id = game.active_comets()[0].id;

    walk_to(&mut game, 7)?;
    game.perform_action()?;
    assert!(game.is_completed());
    assert!(game.active_comets().is_empty());
    assert!(game.catch_comet(id).is_empty());

    assert!(game.move_player(Direction::West)?.is_empty());
    assert!(game.perform_action()?.is_empty());
    let later = game.tick(secs(3 * 3600));
    assert!(!later
        .iter()
        .any(|e| matches!(e, GameEvent::CometLaunched { .. })));
    assert_eq!(game.session.score, 50);
    Ok(())
}

#[test]
fn test_portal_timer_armed_once() -> StarMazeResult<()> {
    let mut game = open_board();
    let before = game.pending_timers();
    game.move_player(Direction::East)?;
    let armed = game.pending_timers();
    assert_eq!(armed, before + 2);

    game.move_player(Direction::East)?;
    game.move_player(Direction::West)?;
    assert_eq!(game.pending_timers(), armed);

    let events = game.tick(secs(10));
    assert!(events.contains(&GameEvent::SpawnPortalExpired {
        position: Position::origin()
    }));
    assert!(game.objects.spawn_portal.is_none());
    Ok(())
}
