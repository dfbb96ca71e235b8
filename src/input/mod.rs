//! # Input Module
//!
//! Keyboard, pointer and text input for the game.
//!
//! Key mapping is a pure function of the key code so it can be tested without
//! a window. The handler only asks macroquad which keys went down this frame.

use crate::game::{CheatTarget, Direction};
use macroquad::prelude::*;

/// Longest answer the challenge box accepts.
pub const MAX_ANSWER_LENGTH: usize = 32;

/// Keys checked every frame, in priority order.
const WATCHED_KEYS: &[KeyCode] = &[
    KeyCode::Escape,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::S,
    KeyCode::A,
    KeyCode::D,
    KeyCode::Space,
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
];

/// Developer shortcuts, available only in dev mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheatCommand {
    RevealAll,
    /// Jump to the next objective
    Teleport,
    GrantShip,
    SolveAllStars,
    SpawnComet,
}

/// Player input types that can be processed by the scene manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    Move(Direction),
    /// Context-sensitive action (space)
    Action,
    Quit,
    Help,
    Cheat(CheatCommand),
}

/// What the player did inside the challenge box this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerCommand {
    Submit(String),
    Skip,
}

/// Maps a key to a game input.
///
/// # Examples
///
/// ```
/// use macroquad::prelude::KeyCode;
/// use starmaze::{map_key, Direction, PlayerInput};
///
/// assert_eq!(map_key(KeyCode::W, false), Some(PlayerInput::Move(Direction::North)));
/// assert_eq!(map_key(KeyCode::Space, false), Some(PlayerInput::Action));
/// assert_eq!(map_key(KeyCode::F2, false), None);
/// ```
pub fn map_key(key: KeyCode, dev_mode: bool) -> Option<PlayerInput> {
    let input = match key {
        KeyCode::Escape => PlayerInput::Quit,
        KeyCode::Up | KeyCode::W => PlayerInput::Move(Direction::North),
        KeyCode::Down | KeyCode::S => PlayerInput::Move(Direction::South),
        KeyCode::Left | KeyCode::A => PlayerInput::Move(Direction::West),
        KeyCode::Right | KeyCode::D => PlayerInput::Move(Direction::East),
        KeyCode::Space => PlayerInput::Action,
        KeyCode::F1 => PlayerInput::Help,
        KeyCode::F2 if dev_mode => PlayerInput::Cheat(CheatCommand::RevealAll),
        KeyCode::F3 if dev_mode => PlayerInput::Cheat(CheatCommand::Teleport),
        KeyCode::F4 if dev_mode => PlayerInput::Cheat(CheatCommand::GrantShip),
        KeyCode::F5 if dev_mode => PlayerInput::Cheat(CheatCommand::SolveAllStars),
        KeyCode::F6 if dev_mode => PlayerInput::Cheat(CheatCommand::SpawnComet),
        _ => return None,
    };
    Some(input)
}

/// Input handler for processing player commands.
pub struct InputHandler {
    /// Whether the F2-F6 cheats are live
    pub dev_mode: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl InputHandler {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    /// The first mapped key pressed this frame.
    pub fn get_input(&self) -> Option<PlayerInput> {
        WATCHED_KEYS
            .iter()
            .filter(|key| is_key_pressed(**key))
            .find_map(|key| map_key(*key, self.dev_mode))
    }

    /// Whether any key went down this frame.
    pub fn any_key_pressed(&self) -> bool {
        get_last_key_pressed().is_some()
    }

    /// Screen position of a click or tap that started this frame.
    pub fn get_pointer(&self) -> Option<Vec2> {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            return Some(vec2(x, y));
        }
        touches()
            .into_iter()
            .find(|t| t.phase == TouchPhase::Started)
            .map(|t| t.position)
    }

    /// Feeds this frame's typing into the answer box.
    pub fn read_answer(&self, answer: &mut AnswerInput) -> Option<AnswerCommand> {
        while let Some(c) = get_char_pressed() {
            answer.push(c);
        }
        if is_key_pressed(KeyCode::Backspace) {
            answer.backspace();
        }
        if is_key_pressed(KeyCode::Escape) {
            answer.clear();
            return Some(AnswerCommand::Skip);
        }
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            return Some(AnswerCommand::Submit(answer.take()));
        }
        None
    }
}

/// Text typed into the challenge box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerInput {
    text: String,
}

impl AnswerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends a printable character; control characters are dropped.
    pub fn push(&mut self, c: char) {
        if c.is_control() || self.text.chars().count() >= MAX_ANSWER_LENGTH {
            return;
        }
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the typed text and empties the box.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

/// Which cheat target F3 jumps to: the next thing the player still needs.
pub fn next_teleport_target(stars_left: usize, has_ship: bool) -> CheatTarget {
    if stars_left > 0 {
        CheatTarget::Star
    } else if !has_ship {
        CheatTarget::Ship
    } else {
        CheatTarget::ExitPortal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        for (keys, direction) in [
            ([KeyCode::Up, KeyCode::W], Direction::North),
            ([KeyCode::Down, KeyCode::S], Direction::South),
            ([KeyCode::Left, KeyCode::A], Direction::West),
            ([KeyCode::Right, KeyCode::D], Direction::East),
        ] {
            for key in keys {
                assert_eq!(map_key(key, false), Some(PlayerInput::Move(direction)));
            }
        }
    }

    #[test]
    fn test_cheats_need_dev_mode() {
        assert_eq!(map_key(KeyCode::F5, false), None);
        assert_eq!(
            map_key(KeyCode::F5, true),
            Some(PlayerInput::Cheat(CheatCommand::SolveAllStars))
        );
        assert_eq!(map_key(KeyCode::Escape, true), Some(PlayerInput::Quit));
        assert_eq!(map_key(KeyCode::Q, true), None);
    }

    #[test]
    fn test_answer_input_editing() {
        let mut answer = AnswerInput::new();
        for c in "28\n".chars() {
            answer.push(c);
        }
        assert_eq!(answer.text(), "28");
        answer.backspace();
        answer.push('7');
        assert_eq!(answer.take(), "27");
        assert_eq!(answer.text(), "");
        answer.backspace();
        assert_eq!(answer.text(), "");
    }

    #[test]
    fn test_answer_length_is_capped() {
        let mut answer = AnswerInput::new();
        for _ in 0..100 {
            answer.push('9');
        }
        assert_eq!(answer.text().len(), MAX_ANSWER_LENGTH);
    }

    #[test]
    fn test_next_teleport_target() {
        assert_eq!(next_teleport_target(3, false), CheatTarget::Star);
        assert_eq!(next_teleport_target(0, false), CheatTarget::Ship);
        assert_eq!(next_teleport_target(0, true), CheatTarget::ExitPortal);
    }
}
