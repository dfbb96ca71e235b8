//! # Board Layout
//!
//! Screen geometry for the board: where cells land in pixels, where a comet is
//! along its flight path and which comet a click lands on. Pure math, no
//! drawing, so it can be tested without a window.

use crate::game::{Comet, CometDirection, CometId, Position};
use crate::{GameConfig, Maze};
use macroquad::math::{vec2, Vec2};
use std::time::Duration;

/// Radius around a comet's head that counts as a hit, in pixels.
pub const COMET_HIT_RADIUS: f32 = 28.0;

/// Placement of the maze on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    /// Top-left corner of cell (0, 0)
    pub origin: Vec2,
    pub cell_size: f32,
    pub width: u32,
    pub height: u32,
}

impl BoardLayout {
    /// Centres the board inside the padding used to size the grid.
    pub fn new(config: &GameConfig, maze: &Maze) -> Self {
        let inset = config.maze_padding / 2.0;
        Self {
            origin: vec2(inset, inset),
            cell_size: config.cell_size,
            width: maze.width,
            height: maze.height,
        }
    }

    /// Board size in pixels.
    pub fn size(&self) -> Vec2 {
        vec2(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, pos: Position) -> Vec2 {
        self.origin + vec2(pos.x as f32, pos.y as f32) * self.cell_size
    }

    pub fn cell_center(&self, pos: Position) -> Vec2 {
        self.cell_origin(pos) + Vec2::splat(self.cell_size / 2.0)
    }

    /// Where a comet's head is at game time `now`.
    ///
    /// Comets cross the board diagonally from top to bottom, starting and
    /// ending one cell outside it.
    pub fn comet_position(&self, comet: &Comet, now: Duration) -> Vec2 {
        let margin = self.cell_size;
        let size = self.size();
        let left = self.origin.x - margin;
        let right = self.origin.x + size.x + margin;
        let (start_x, end_x) = match comet.direction {
            CometDirection::LeftToRight => (left, right),
            CometDirection::RightToLeft => (right, left),
        };
        let start = vec2(start_x, self.origin.y - margin);
        let end = vec2(end_x, self.origin.y + size.y + margin);
        start.lerp(end, comet.progress(now))
    }

    /// The comet under a click at `point`, if any.
    pub fn comet_at(&self, comets: &[Comet], now: Duration, point: Vec2) -> Option<CometId> {
        comets
            .iter()
            .map(|c| (c.id, self.comet_position(c, now).distance(point)))
            .filter(|(_, distance)| *distance <= COMET_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_comet_id;

    fn layout() -> BoardLayout {
        BoardLayout {
            origin: vec2(40.0, 40.0),
            cell_size: 32.0,
            width: 10,
            height: 5,
        }
    }

    fn comet(direction: CometDirection) -> Comet {
        Comet {
            id: new_comet_id(),
            direction,
            launched_at: Duration::ZERO,
            expires_at: Duration::from_secs(10),
            expiry: None,
        }
    }

    #[test]
    fn test_cell_geometry() {
        let layout = layout();
        assert_eq!(layout.size(), vec2(320.0, 160.0));
        assert_eq!(layout.cell_origin(Position::new(2, 1)), vec2(104.0, 72.0));
        assert_eq!(layout.cell_center(Position::new(0, 0)), vec2(56.0, 56.0));
    }

    #[test]
    fn test_comet_path() {
        let layout = layout();
        let ltr = comet(CometDirection::LeftToRight);
        assert_eq!(layout.comet_position(&ltr, Duration::ZERO), vec2(8.0, 8.0));
        assert_eq!(
            layout.comet_position(&ltr, Duration::from_secs(10)),
            vec2(392.0, 232.0)
        );

        let rtl = comet(CometDirection::RightToLeft);
        assert_eq!(layout.comet_position(&rtl, Duration::ZERO), vec2(392.0, 8.0));
    }

    #[test]
    fn test_comet_hit_test() {
        let layout = layout();
        let comets = vec![comet(CometDirection::LeftToRight)];
        let now = Duration::from_secs(5);
        let head = layout.comet_position(&comets[0], now);

        assert_eq!(layout.comet_at(&comets, now, head), Some(comets[0].id));
        assert_eq!(
            layout.comet_at(&comets, now, head + vec2(10.0, 10.0)),
            Some(comets[0].id)
        );
        assert_eq!(layout.comet_at(&comets, now, head + vec2(100.0, 0.0)), None);
        assert_eq!(layout.comet_at(&[], now, head), None);
    }
}
