//! # Scene Management System
//!
//! Owns the one [`GameState`] of the running session and moves between the
//! ready screen, play and the completion screen. Every frame it advances the
//! game clock, routes input into the state and hands the result to the display.

use crate::input::{next_teleport_target, AnswerCommand, AnswerInput, CheatCommand};
use crate::rendering::BoardLayout;
use crate::{
    GameEvent, GameState, InputHandler, MacroquadDisplay, PlayerInput, ScheduleSource,
    StarMazeResult,
};
use log::info;
use macroquad::prelude::*;
use std::time::Duration;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    /// Title screen, waiting for any key
    Ready,
    Playing,
    Completed,
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    game_state: GameState,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    answer: AnswerInput,
    schedule: Option<ScheduleSource>,
    /// Frame time at which game time zero was taken
    clock_start: f64,
}

impl SceneManager {
    pub fn new(
        game_state: GameState,
        input_handler: InputHandler,
        schedule: Option<ScheduleSource>,
    ) -> Self {
        Self {
            current_scene: SceneType::Ready,
            game_state,
            display: MacroquadDisplay::new(),
            input_handler,
            answer: AnswerInput::new(),
            schedule,
            clock_start: get_time(),
        }
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> StarMazeResult<()> {
        loop {
            let exit = match self.current_scene {
                SceneType::Ready => self.update_ready_scene(),
                SceneType::Playing => self.update_playing_scene()?,
                SceneType::Completed => self.update_completed_scene(),
            };
            if exit {
                break;
            }
            next_frame().await;
        }
        info!("Scene loop ended");
        Ok(())
    }

    fn game_time(&self) -> Duration {
        Duration::from_secs_f64((get_time() - self.clock_start).max(0.0))
    }

    fn update_ready_scene(&mut self) -> bool {
        self.display
            .render_ready(self.schedule.as_ref().map(|source| &source.view));

        if is_key_pressed(KeyCode::Escape) {
            return true;
        }
        if is_key_pressed(KeyCode::R) {
            if let Some(source) = self.schedule.as_mut() {
                if source.retry() {
                    info!("Schedule reloaded");
                    return false;
                }
            }
        }
        if self.input_handler.any_key_pressed() || self.input_handler.get_pointer().is_some() {
            let events = self.game_state.start(self.game_time());
            self.display.handle_events(&events);
            self.current_scene = SceneType::Playing;
        }
        false
    }

    /// Updates the playing scene, returns true if exit is requested
    fn update_playing_scene(&mut self) -> StarMazeResult<bool> {
        let events = self.game_state.tick(self.game_time());
        self.display.handle_events(&events);

        if self.game_state.challenge.is_some() {
            self.handle_answer_input()?;
        } else if self.handle_play_input()? {
            return Ok(true);
        }

        if self.game_state.is_completed() {
            self.current_scene = SceneType::Completed;
        }

        self.display.render_game(&self.game_state, &self.answer);
        Ok(false)
    }

    fn handle_answer_input(&mut self) -> StarMazeResult<()> {
        let events = match self.input_handler.read_answer(&mut self.answer) {
            Some(AnswerCommand::Submit(text)) => self.game_state.submit_answer(&text)?,
            Some(AnswerCommand::Skip) => self.game_state.skip_challenge(),
            None => return Ok(()),
        };
        self.display.handle_events(&events);
        Ok(())
    }

    /// Returns true if exit is requested
    fn handle_play_input(&mut self) -> StarMazeResult<bool> {
        if let Some(point) = self.input_handler.get_pointer() {
            let layout = BoardLayout::new(&self.game_state.config, &self.game_state.maze);
            if let Some(id) =
                layout.comet_at(self.game_state.active_comets(), self.game_state.now(), point)
            {
                let events = self.game_state.catch_comet(id);
                self.display.handle_events(&events);
            }
        }

        let Some(input) = self.input_handler.get_input() else {
            return Ok(false);
        };

        let events = match input {
            PlayerInput::Quit => return Ok(true),
            PlayerInput::Help => {
                self.display.show_help = !self.display.show_help;
                Vec::new()
            }
            PlayerInput::Move(direction) => self.game_state.move_player(direction)?,
            PlayerInput::Action => {
                let events = self.game_state.perform_action()?;
                if events
                    .iter()
                    .any(|e| matches!(e, GameEvent::ChallengeOpened { .. }))
                {
                    self.answer.clear();
                }
                events
            }
            PlayerInput::Cheat(command) => self.handle_cheat(command)?,
        };
        self.display.handle_events(&events);
        Ok(false)
    }

    fn handle_cheat(&mut self, command: CheatCommand) -> StarMazeResult<Vec<GameEvent>> {
        if !self.input_handler.dev_mode {
            return Ok(Vec::new());
        }
        self.display.add_message(format!("Cheat: {:?}", command));

        let game = &mut self.game_state;
        let events = match command {
            CheatCommand::RevealAll => game.reveal_all(),
            CheatCommand::Teleport => {
                let target =
                    next_teleport_target(game.objects.unsolved_star_count(), game.session.has_ship);
                game.teleport_to(target)?
            }
            CheatCommand::GrantShip => game.grant_ship(),
            CheatCommand::SolveAllStars => game.solve_all_stars(),
            CheatCommand::SpawnComet => game.spawn_comet(),
        };
        Ok(events)
    }

    fn update_completed_scene(&mut self) -> bool {
        self.display.render_game(&self.game_state, &self.answer);
        self.display.render_completed(&self.game_state);
        is_key_pressed(KeyCode::Escape)
    }
}
