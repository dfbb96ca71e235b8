//! # Game State Module
//!
//! The session controller: owns the maze, the placed objects, the player, the
//! score and every timer, and exposes one method per kind of input.
//!
//! Every operation runs to completion and reports what happened as a list of
//! [`GameEvent`]s. The front end turns those into messages and redraws; tests
//! inspect them directly. Time only moves forward through [`GameState::tick`].

use crate::game::{
    adjacent_block, can_move_to, AnswerOutcome, BlockHit, Challenge, Comet, CometDirection,
    CometId, CometSystem, Direction, GameObjects, HiddenItem, Position, Scheduler, TimerHandle,
    TimerKind,
};
use crate::generation::utils::create_rng;
use crate::{
    GameConfig, GenerationConfig, Generator, Maze, MazeGenerator, ObjectPlacer, StarMazeError,
    StarMazeResult,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Score and progress of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u32,
    pub stars_found: u32,
    pub comets_caught: u32,
    /// The ship is in the player's pocket
    pub has_ship: bool,
    /// Successful steps taken
    pub moves: u32,
}

/// Game completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Exit portal activated; input is inert from here on
    Completed,
}

/// Something that happened as a result of input or a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    PlayerMoved { from: Position, to: Position },
    MoveBlocked { target: Position },
    BlockCracked { position: Position },
    BlockDestroyed { position: Position },
    ItemRevealed { item: HiddenItem, position: Position },
    ChallengeOpened { star: usize, prompt: String, attempts: u32 },
    AnswerRejected,
    WrongAnswer { attempts_left: u32 },
    StarSolved { star: usize, position: Position, points: u32 },
    ChallengeFailed { star: usize },
    ChallengeSkipped { star: usize },
    ShipCollected { position: Position },
    PortalLocked { stars_remaining: usize, needs_ship: bool },
    GameCompleted { score: u32 },
    CometLaunched { id: CometId, direction: CometDirection },
    CometCaught { id: CometId, points: u32 },
    CometExpired { id: CometId },
    CometSpawningStopped,
    SpawnPortalExpired { position: Position },
}

impl GameEvent {
    /// Player-facing text for events worth announcing.
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::GameStarted => {
                Some("The maze is ready! Arrows/WASD to move, SPACE to act.".to_string())
            }
            GameEvent::BlockDestroyed { .. } => Some("The block crumbles!".to_string()),
            GameEvent::ItemRevealed { item, .. } => Some(match item {
                HiddenItem::Star(_) => "A star was hiding behind the block!".to_string(),
                HiddenItem::Ship => "A flying saucer was hiding behind the block!".to_string(),
                HiddenItem::Portal => "You found the exit portal!".to_string(),
            }),
            GameEvent::AnswerRejected => Some("Type an answer first!".to_string()),
            GameEvent::WrongAnswer { attempts_left } => Some(format!(
                "Wrong! Attempts left: {}",
                attempts_left
            )),
            GameEvent::StarSolved { points, .. } => {
                Some(format!("Correct! The star is yours (+{} points)", points))
            }
            GameEvent::ChallengeFailed { .. } => {
                Some("Out of attempts! You can come back to this star later.".to_string())
            }
            GameEvent::ShipCollected { .. } => {
                Some("The saucer is in your pocket!".to_string())
            }
            GameEvent::PortalLocked {
                stars_remaining,
                needs_ship,
            } => {
                let mut missing = Vec::new();
                if *stars_remaining > 0 {
                    missing.push(format!("solve {} more star(s)", stars_remaining));
                }
                if *needs_ship {
                    missing.push("pick up the saucer".to_string());
                }
                Some(format!("The portal is locked: {}", missing.join(" and ")))
            }
            GameEvent::GameCompleted { score } => {
                Some(format!("Mission complete! Points earned: {}", score))
            }
            GameEvent::CometCaught { points, .. } => {
                Some(format!("Comet caught! +{} points", points))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PortalTimer {
    armed: bool,
    primary: Option<TimerHandle>,
    fallback: Option<TimerHandle>,
}

/// Central game state for one session.
///
/// There is exactly one per running game; the scene manager owns it and no
/// other code keeps mutable state of its own.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    pub generation: GenerationConfig,
    pub maze: Maze,
    pub objects: GameObjects,
    pub player: Position,
    pub session: SessionStats,
    pub completion_state: GameCompletionState,
    /// Question currently on screen
    pub challenge: Option<Challenge>,
    pub comets: CometSystem,
    pub started: bool,
    /// Game time of the last tick
    now: Duration,
    #[serde(skip)]
    scheduler: Scheduler,
    #[serde(skip)]
    portal_timer: PortalTimer,
    #[serde(skip)]
    rng: StdRng,
}

impl GameState {
    /// Generates a fresh board and returns a session ready to start.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{GameConfig, GameState, GenerationConfig};
    ///
    /// let config = GameConfig::default();
    /// let generation = GenerationConfig::from_game_config(&config, 12345, 20, 15);
    /// let game = GameState::generate(config, generation).unwrap();
    /// assert_eq!(game.player, game.generation.spawn_cell());
    /// assert!(game.maze.is_perfect());
    /// ```
    pub fn generate(config: GameConfig, generation: GenerationConfig) -> StarMazeResult<Self> {
        config.validate()?;
        let mut rng = create_rng(&generation);
        let maze = MazeGenerator::new().generate(&generation, &mut rng)?;
        let objects = ObjectPlacer::new(&maze).generate(&generation, &mut rng)?;
        Self::assemble(config, generation, maze, objects, rng)
    }

    /// Builds a session around a hand-made maze and object layout.
    pub fn from_layout(
        config: GameConfig,
        maze: Maze,
        objects: GameObjects,
        spawn: Position,
        seed: u64,
    ) -> StarMazeResult<Self> {
        config.validate()?;
        let mut generation = GenerationConfig::from_game_config(&config, seed, maze.width, maze.height);
        generation.spawn = spawn;
        if !maze.in_bounds(spawn) {
            return Err(StarMazeError::InvalidState(format!(
                "spawn {:?} is outside the {}x{} maze",
                spawn, maze.width, maze.height
            )));
        }
        let rng = create_rng(&generation);
        Self::assemble(config, generation, maze, objects, rng)
    }

    fn assemble(
        config: GameConfig,
        generation: GenerationConfig,
        maze: Maze,
        objects: GameObjects,
        rng: StdRng,
    ) -> StarMazeResult<Self> {
        let player = generation.spawn_cell();
        if objects.has_block_at(player) {
            return Err(StarMazeError::InvalidState(format!(
                "player spawn {:?} is covered by a block",
                player
            )));
        }

        Ok(Self {
            config,
            generation,
            maze,
            objects,
            player,
            session: SessionStats::default(),
            completion_state: GameCompletionState::Playing,
            challenge: None,
            comets: CometSystem::new(),
            started: false,
            now: Duration::ZERO,
            scheduler: Scheduler::new(),
            portal_timer: PortalTimer::default(),
            rng,
        })
    }

    /// Starts play at game time `now`: the comet spawner begins polling.
    pub fn start(&mut self, now: Duration) -> Vec<GameEvent> {
        if self.started {
            return Vec::new();
        }
        self.now = self.now.max(now);
        self.started = true;
        self.comets.start(
            self.now,
            self.config.comet_poll_interval(),
            self.config.comet_max_delay(),
            &mut self.scheduler,
            &mut self.rng,
        );
        info!(
            "Game started on a {}x{} maze with {} stars",
            self.maze.width,
            self.maze.height,
            self.objects.stars.len()
        );
        vec![GameEvent::GameStarted]
    }

    /// Game time of the last tick.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_completed(&self) -> bool {
        self.completion_state == GameCompletionState::Completed
    }

    /// Movement and actions are ignored before start, after the win and while
    /// a challenge is open.
    pub fn is_input_locked(&self) -> bool {
        !self.started || self.is_completed() || self.challenge.is_some()
    }

    /// Comets currently in flight.
    pub fn active_comets(&self) -> &[Comet] {
        &self.comets.active
    }

    /// Timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn portal_timer_armed(&self) -> bool {
        self.portal_timer.armed
    }

    /// Whether the player may step onto `target` right now.
    pub fn can_move_to(&self, target: Position) -> bool {
        can_move_to(&self.maze, &self.objects.blocks, self.player, target)
    }

    /// Moves the player one cell if nothing is in the way.
    pub fn move_player(&mut self, direction: Direction) -> StarMazeResult<Vec<GameEvent>> {
        if self.is_input_locked() {
            debug!("Ignoring move {:?}: input locked", direction);
            return Ok(Vec::new());
        }

        let from = self.player;
        let target = from.step(direction);
        if !self.can_move_to(target) {
            debug!("Move from {:?} to {:?} blocked", from, target);
            return Ok(vec![GameEvent::MoveBlocked { target }]);
        }

        self.player = target;
        self.session.moves += 1;
        self.arm_portal_timer();
        debug!("Player moved to {:?}", target);
        Ok(vec![GameEvent::PlayerMoved { from, to: target }])
    }

    /// The context-sensitive action (space bar).
    ///
    /// Checks, in order: a reachable block to hit, an open star under the
    /// player, the saucer under the player, the exit portal under the player.
    /// Only the first match is handled.
    pub fn perform_action(&mut self) -> StarMazeResult<Vec<GameEvent>> {
        if self.is_input_locked() {
            return Ok(Vec::new());
        }

        if let Some(index) = adjacent_block(&self.maze, &self.objects.blocks, self.player) {
            return self.hit_block(index);
        }

        if let Some(star) = self.objects.open_star_at(self.player) {
            return self.open_challenge(star);
        }

        if self.objects.collectable_ship_at(self.player) {
            return Ok(self.collect_ship());
        }

        if self.objects.visible_portal_at(self.player) {
            return Ok(self.check_portal_activation());
        }

        debug!("Nothing to interact with at {:?}", self.player);
        Ok(Vec::new())
    }

    fn hit_block(&mut self, index: usize) -> StarMazeResult<Vec<GameEvent>> {
        match self.objects.hit_block(index)? {
            BlockHit::Cracked { position } => Ok(vec![GameEvent::BlockCracked { position }]),
            BlockHit::Destroyed { position, revealed } => {
                let mut events = vec![GameEvent::BlockDestroyed { position }];
                if let Some(item) = revealed {
                    events.push(GameEvent::ItemRevealed { item, position });
                }
                Ok(events)
            }
        }
    }

    fn open_challenge(&mut self, star: usize) -> StarMazeResult<Vec<GameEvent>> {
        let challenge = Challenge::open(
            star,
            &self.config.questions,
            self.config.challenge_attempts,
            &mut self.rng,
        )
        .ok_or_else(|| StarMazeError::InvalidState("question pool is empty".to_string()))?;

        let event = GameEvent::ChallengeOpened {
            star,
            prompt: challenge.question.prompt.clone(),
            attempts: challenge.attempts_left,
        };
        self.challenge = Some(challenge);
        Ok(vec![event])
    }

    /// Submits an answer to the open challenge.
    pub fn submit_answer(&mut self, answer: &str) -> StarMazeResult<Vec<GameEvent>> {
        let challenge = self
            .challenge
            .as_mut()
            .ok_or_else(|| StarMazeError::InvalidAction("no challenge is open".to_string()))?;
        let star = challenge.star;

        match challenge.submit(answer) {
            AnswerOutcome::Empty => Ok(vec![GameEvent::AnswerRejected]),
            AnswerOutcome::Wrong { attempts_left } => {
                Ok(vec![GameEvent::WrongAnswer { attempts_left }])
            }
            AnswerOutcome::Exhausted => {
                self.challenge = None;
                info!("Challenge for star {} failed", star);
                Ok(vec![GameEvent::ChallengeFailed { star }])
            }
            AnswerOutcome::Correct => {
                self.challenge = None;
                self.solve_star(star)
                    .map(|event| vec![event])
                    .ok_or_else(|| StarMazeError::InvalidState(format!("star {} vanished", star)))
            }
        }
    }

    /// Closes the open challenge without using an attempt.
    pub fn skip_challenge(&mut self) -> Vec<GameEvent> {
        match self.challenge.take() {
            Some(challenge) => vec![GameEvent::ChallengeSkipped {
                star: challenge.star,
            }],
            None => Vec::new(),
        }
    }

    /// Marks a star solved and awards its points.
    pub(crate) fn solve_star(&mut self, star: usize) -> Option<GameEvent> {
        let entry = self.objects.stars.get_mut(star)?;
        if entry.solved {
            return None;
        }
        entry.solved = true;
        entry.hidden = true;
        let position = entry.position;

        self.session.stars_found += 1;
        self.session.score += self.config.star_points;
        info!(
            "Star {} solved ({}/{})",
            star,
            self.session.stars_found,
            self.objects.stars.len()
        );
        Some(GameEvent::StarSolved {
            star,
            position,
            points: self.config.star_points,
        })
    }

    fn collect_ship(&mut self) -> Vec<GameEvent> {
        let Some(ship) = self.objects.ship.as_mut() else {
            return Vec::new();
        };
        ship.collected = true;
        ship.hidden = true;
        self.session.has_ship = true;
        vec![GameEvent::ShipCollected {
            position: ship.position,
        }]
    }

    fn check_portal_activation(&mut self) -> Vec<GameEvent> {
        if self.objects.all_stars_solved() && self.session.has_ship {
            return self.complete();
        }

        vec![GameEvent::PortalLocked {
            stars_remaining: self.objects.unsolved_star_count(),
            needs_ship: !self.session.has_ship,
        }]
    }

    fn complete(&mut self) -> Vec<GameEvent> {
        if let Some(portal) = self.objects.portal.as_mut() {
            portal.activated = true;
        }
        self.completion_state = GameCompletionState::Completed;
        self.challenge = None;
        self.comets.stop(&mut self.scheduler);
        self.comets.clear(&mut self.scheduler);
        info!("Game completed with {} points", self.session.score);
        vec![GameEvent::GameCompleted {
            score: self.session.score,
        }]
    }

    /// Catches a comet in flight (click or tap).
    pub fn catch_comet(&mut self, id: CometId) -> Vec<GameEvent> {
        if self.is_completed() {
            return Vec::new();
        }
        if self.session.comets_caught >= self.config.comets_max {
            debug!("Comet {} ignored: catch cap reached", id);
            return Vec::new();
        }
        if self.comets.remove(id, &mut self.scheduler).is_none() {
            warn!("Tried to catch unknown comet {}", id);
            return Vec::new();
        }

        self.session.comets_caught += 1;
        self.session.score += self.config.comet_points;
        let mut events = vec![GameEvent::CometCaught {
            id,
            points: self.config.comet_points,
        }];

        if self.session.comets_caught >= self.config.comets_max && self.comets.is_running() {
            self.comets.stop(&mut self.scheduler);
            events.push(GameEvent::CometSpawningStopped);
        }
        events
    }

    /// Launches a comet right away unless the game is over.
    pub(crate) fn launch_comet(&mut self) -> Vec<GameEvent> {
        if self.is_completed() {
            return Vec::new();
        }
        let comet = self.comets.launch(
            self.now,
            self.config.comet_flight(),
            &mut self.scheduler,
            &mut self.rng,
        );
        debug!("Comet {} launched {:?}", comet.id, comet.direction);
        vec![GameEvent::CometLaunched {
            id: comet.id,
            direction: comet.direction,
        }]
    }

    fn arm_portal_timer(&mut self) {
        if self.portal_timer.armed {
            return;
        }
        let expiry = self.config.portal_expiry();
        self.portal_timer = PortalTimer {
            armed: true,
            primary: Some(
                self.scheduler
                    .schedule_after(self.now, expiry, TimerKind::PortalExpiry),
            ),
            fallback: Some(self.scheduler.schedule_after(
                self.now,
                expiry + self.config.portal_fallback(),
                TimerKind::PortalForcedRemoval,
            )),
        };
        debug!("Spawn portal expires in {:?}", expiry);
    }

    fn remove_spawn_portal(&mut self) -> Vec<GameEvent> {
        match self.objects.spawn_portal.take() {
            Some(position) => vec![GameEvent::SpawnPortalExpired { position }],
            None => Vec::new(),
        }
    }

    /// Advances game time to `now`, firing every timer due on the way.
    ///
    /// Each timer is handled at its own due time, so a long gap between ticks
    /// plays out exactly like many short ones.
    pub fn tick(&mut self, now: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();

        while let Some(due) = self.scheduler.next_due() {
            if due > now {
                break;
            }
            let Some((handle, kind)) = self.scheduler.pop_due(due) else {
                break;
            };
            self.now = self.now.max(due);
            events.extend(self.handle_timer(handle, kind));
        }

        self.now = self.now.max(now);
        events
    }

    fn handle_timer(&mut self, handle: TimerHandle, kind: TimerKind) -> Vec<GameEvent> {
        match kind {
            TimerKind::CometPoll => self.poll_comets(handle),
            TimerKind::CometExpiry(id) => match self.comets.remove(id, &mut self.scheduler) {
                Some(_) => vec![GameEvent::CometExpired { id }],
                None => Vec::new(),
            },
            TimerKind::PortalExpiry => {
                self.portal_timer.primary = None;
                let events = self.remove_spawn_portal();
                if self.objects.spawn_portal.is_none() {
                    if let Some(fallback) = self.portal_timer.fallback.take() {
                        self.scheduler.cancel(fallback);
                    }
                }
                events
            }
            TimerKind::PortalForcedRemoval => {
                self.portal_timer.fallback = None;
                let events = self.remove_spawn_portal();
                if !events.is_empty() {
                    warn!("Spawn portal needed the forced removal");
                }
                events
            }
        }
    }

    fn poll_comets(&mut self, handle: TimerHandle) -> Vec<GameEvent> {
        if self.comets.poll == Some(handle) {
            self.comets.poll = None;
        }

        if self.is_completed() || self.session.comets_caught >= self.config.comets_max {
            info!("Comet spawning stopped");
            return vec![GameEvent::CometSpawningStopped];
        }

        let mut events = Vec::new();
        if self.now >= self.comets.next_spawn_at {
            events.extend(self.launch_comet());
            self.comets
                .schedule_next_spawn(self.now, self.config.comet_max_delay(), &mut self.rng);
        }

        self.comets.poll = Some(self.scheduler.schedule_after(
            self.now,
            self.config.comet_poll_interval(),
            TimerKind::CometPoll,
        ));
        events
    }

    /// Serializes the visible session state to JSON.
    pub fn save_to_json(&self) -> StarMazeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
