//! # Display Management
//!
//! Draws the board, the HUD and every overlay with macroquad. The display only
//! reads the game state; the one thing it keeps itself is the message log and
//! a short fade animation for the spawn portal.

use crate::game::{Challenge, GameEvent, GameState, Position};
use crate::input::AnswerInput;
use crate::rendering::BoardLayout;
use crate::{Maze, ScheduleView};
use macroquad::prelude::*;
use std::time::Duration;

const NEON_WALL: Color = Color::new(0.0, 0.9, 1.0, 1.0);
const BLOCK_COLOR: Color = Color::new(0.45, 0.3, 0.7, 1.0);
const CRACKED_BLOCK_COLOR: Color = Color::new(0.3, 0.2, 0.45, 1.0);
const PANEL_COLOR: Color = Color::new(0.03, 0.03, 0.1, 0.92);

/// Seconds the spawn portal takes to fade out.
const PORTAL_FADE_SECS: f64 = 1.0;

const COMET_TAIL: Duration = Duration::from_millis(400);

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    pub show_help: bool,
    /// Spawn portal position and the frame time its fade started
    portal_fade: Option<(Position, f64)>,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_messages: 100,
            show_help: false,
            portal_fade: None,
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Turns events into log lines and animations.
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::SpawnPortalExpired { position } = event {
                self.portal_fade = Some((*position, get_time()));
            }
            if let Some(message) = event.message() {
                self.add_message(message);
            }
        }
    }

    /// Renders one frame of play.
    pub fn render_game(&mut self, game: &GameState, answer: &AnswerInput) {
        clear_background(BLACK);
        let layout = BoardLayout::new(&game.config, &game.maze);

        self.render_maze(&game.maze, &layout);
        self.render_objects(game, &layout);
        self.render_player(game.player, &layout);
        self.render_comets(game, &layout);
        self.render_hud(game, &layout);
        self.render_messages();

        if let Some(challenge) = &game.challenge {
            self.render_challenge(challenge, answer);
        }
        if self.show_help {
            self.render_help();
        }
    }

    fn render_maze(&self, maze: &Maze, layout: &BoardLayout) {
        let thickness = 2.0;
        for cell in maze.iter_cells() {
            let top_left = layout.cell_origin(cell.position);
            let size = layout.cell_size;
            let (x, y) = (top_left.x, top_left.y);

            if cell.walls.top {
                draw_line(x, y, x + size, y, thickness, NEON_WALL);
            }
            if cell.walls.right {
                draw_line(x + size, y, x + size, y + size, thickness, NEON_WALL);
            }
            if cell.walls.bottom {
                draw_line(x, y + size, x + size, y + size, thickness, NEON_WALL);
            }
            if cell.walls.left {
                draw_line(x, y, x, y + size, thickness, NEON_WALL);
            }
        }
    }

    fn render_objects(&mut self, game: &GameState, layout: &BoardLayout) {
        let size = layout.cell_size;
        let objects = &game.objects;

        if let Some(spawn) = objects.spawn_portal {
            let pulse = 0.6 + 0.4 * (get_time() * 3.0).sin() as f32;
            self.draw_portal(layout, spawn, Color::new(0.3, 1.0, 0.5, pulse));
        } else if let Some((position, started)) = self.portal_fade {
            let elapsed = get_time() - started;
            if elapsed < PORTAL_FADE_SECS {
                let alpha = (1.0 - elapsed / PORTAL_FADE_SECS) as f32;
                self.draw_portal(layout, position, Color::new(0.3, 1.0, 0.5, alpha));
            } else {
                self.portal_fade = None;
            }
        }

        if let Some(portal) = objects.portal.as_ref().filter(|p| !p.hidden) {
            let color = if portal.activated { GOLD } else { MAGENTA };
            self.draw_portal(layout, portal.position, color);
        }

        for star in objects.stars.iter().filter(|s| !s.hidden) {
            let center = layout.cell_center(star.position);
            draw_poly(center.x, center.y, 5, size * 0.35, -90.0, YELLOW);
        }

        if let Some(ship) = objects.ship.as_ref().filter(|s| !s.hidden) {
            let center = layout.cell_center(ship.position);
            draw_ellipse(center.x, center.y, size * 0.4, size * 0.15, 0.0, LIGHTGRAY);
            draw_circle(center.x, center.y - size * 0.1, size * 0.15, SKYBLUE);
        }

        for block in &objects.blocks {
            let top_left = layout.cell_origin(block.position);
            let inset = size * 0.1;
            let color = if block.is_cracked() {
                CRACKED_BLOCK_COLOR
            } else {
                BLOCK_COLOR
            };
            draw_rectangle(
                top_left.x + inset,
                top_left.y + inset,
                size - 2.0 * inset,
                size - 2.0 * inset,
                color,
            );
            if block.is_cracked() {
                draw_line(
                    top_left.x + inset,
                    top_left.y + inset,
                    top_left.x + size - inset,
                    top_left.y + size - inset,
                    2.0,
                    BLACK,
                );
            }
        }
    }

    fn draw_portal(&self, layout: &BoardLayout, position: Position, color: Color) {
        let center = layout.cell_center(position);
        draw_circle_lines(center.x, center.y, layout.cell_size * 0.38, 3.0, color);
        draw_circle_lines(center.x, center.y, layout.cell_size * 0.22, 2.0, color);
    }

    fn render_player(&self, player: Position, layout: &BoardLayout) {
        let center = layout.cell_center(player);
        draw_circle(center.x, center.y, layout.cell_size * 0.3, GREEN);
        draw_circle(center.x, center.y - layout.cell_size * 0.05, layout.cell_size * 0.1, BLACK);
    }

    fn render_comets(&self, game: &GameState, layout: &BoardLayout) {
        for comet in game.active_comets() {
            let head = layout.comet_position(comet, game.now());
            let tail = layout.comet_position(comet, game.now().saturating_sub(COMET_TAIL));
            draw_line(tail.x, tail.y, head.x, head.y, 4.0, Color::new(1.0, 0.8, 0.3, 0.5));
            draw_circle(head.x, head.y, 8.0, ORANGE);
        }
    }

    fn render_hud(&self, game: &GameState, layout: &BoardLayout) {
        let x = layout.origin.x;
        let y = (layout.origin.y - 4.0).max(16.0);
        let session = &game.session;
        let pocket = if session.has_ship { "ship" } else { "empty" };

        let hud = format!(
            "Points: {}   Stars: {}/{}   Pocket: {}   Comets: {}/{}",
            session.score,
            session.stars_found,
            game.config.star_count,
            pocket,
            session.comets_caught,
            game.config.comets_max
        );
        draw_text(&hud, x, y, 20.0, WHITE);
    }

    /// Renders the message area.
    fn render_messages(&self) {
        let message_area_y = screen_height() - 60.0;
        let message_count = 3;
        let line_height = 18.0;

        if self.messages.is_empty() {
            return;
        }
        draw_rectangle(
            0.0,
            message_area_y - 20.0,
            screen_width(),
            80.0,
            Color::new(0.0, 0.0, 0.0, 0.7),
        );

        let start_index = self.messages.len().saturating_sub(message_count);
        for (i, message) in self.messages.iter().skip(start_index).enumerate() {
            let y = message_area_y + i as f32 * line_height;
            draw_text(message, 10.0, y, 16.0, WHITE);
        }
    }

    fn render_challenge(&self, challenge: &Challenge, answer: &AnswerInput) {
        let width = 420.0_f32.min(screen_width() - 20.0);
        let height = 180.0;
        let x = (screen_width() - width) / 2.0;
        let y = (screen_height() - height) / 2.0;

        draw_rectangle(x, y, width, height, PANEL_COLOR);
        draw_rectangle_lines(x, y, width, height, 2.0, YELLOW);
        draw_text("Answer the question to claim the star", x + 16.0, y + 30.0, 18.0, YELLOW);
        draw_text(&challenge.question.prompt, x + 16.0, y + 70.0, 24.0, WHITE);

        draw_rectangle_lines(x + 16.0, y + 90.0, width - 32.0, 34.0, 2.0, GRAY);
        let cursor = if get_time().fract() < 0.5 { "_" } else { "" };
        draw_text(
            &format!("{}{}", answer.text(), cursor),
            x + 24.0,
            y + 114.0,
            22.0,
            WHITE,
        );

        draw_text(
            &format!(
                "Attempts left: {}   ENTER: submit   ESC: skip",
                challenge.attempts_left
            ),
            x + 16.0,
            y + 155.0,
            16.0,
            LIGHTGRAY,
        );
    }

    fn render_help(&self) {
        let lines = [
            "Arrows / WASD: move",
            "SPACE: hit a block, open a star, pick up the saucer, enter the portal",
            "Click or tap: catch a comet",
            "F1: close help   ESC: quit",
        ];
        let x = 40.0;
        let y = screen_height() / 2.0 - 60.0;
        draw_rectangle(x - 10.0, y - 30.0, 620.0, 130.0, PANEL_COLOR);
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, x, y + i as f32 * 24.0, 18.0, WHITE);
        }
    }

    /// Title screen shown before the first key press.
    pub fn render_ready(&self, schedule: Option<&ScheduleView>) {
        clear_background(BLACK);
        let title = "STAR MAZE";
        let dims = measure_text(title, None, 48, 1.0);
        draw_text(
            title,
            (screen_width() - dims.width) / 2.0,
            screen_height() / 3.0,
            48.0,
            NEON_WALL,
        );
        draw_text(
            "Find 5 stars, pick up the saucer and reach the portal. Press any key.",
            40.0,
            screen_height() / 3.0 + 50.0,
            20.0,
            WHITE,
        );

        if let Some(schedule) = schedule {
            let mut y = screen_height() / 3.0 + 100.0;
            for line in schedule.render_lines() {
                draw_text(&line, 40.0, y, 16.0, LIGHTGRAY);
                y += 18.0;
            }
        }
    }

    /// Completion screen drawn over the final board.
    pub fn render_completed(&self, game: &GameState) {
        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), PANEL_COLOR);
        let lines = [
            "MISSION COMPLETE!".to_string(),
            format!("Points earned: {}", game.session.score),
            format!("Stars: {}   Comets: {}", game.session.stars_found, game.session.comets_caught),
            "Press ESC to leave".to_string(),
        ];
        let mut y = screen_height() / 2.0 - 60.0;
        for (i, line) in lines.iter().enumerate() {
            let size = if i == 0 { 40.0 } else { 22.0 };
            let dims = measure_text(line, None, size as u16, 1.0);
            draw_text(line, (screen_width() - dims.width) / 2.0, y, size, GOLD);
            y += size + 12.0;
        }
    }
}
