//! # Developer Cheats
//!
//! Shortcuts for testing a board without playing it through. Only reachable
//! from the front end in dev mode. Every cheat goes through the same state and
//! events as normal play.

use crate::game::{GameEvent, GameState, HiddenItem, Position};
use crate::StarMazeResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Where [`GameState::teleport_to`] sends the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheatTarget {
    /// First unsolved star
    Star,
    Ship,
    ExitPortal,
    SpawnPortal,
    /// First standing block
    Block,
}

impl GameState {
    /// Reveals every hidden item without breaking its block.
    pub fn reveal_all(&mut self) -> Vec<GameEvent> {
        let items: Vec<(HiddenItem, Position)> = self
            .objects
            .blocks
            .iter()
            .filter_map(|b| b.hidden_item.map(|item| (item, b.position)))
            .collect();

        let mut events = Vec::with_capacity(items.len());
        for (item, position) in items {
            self.objects.reveal(item);
            events.push(GameEvent::ItemRevealed { item, position });
        }
        info!("Cheat: revealed {} items", events.len());
        events
    }

    /// Moves the player straight onto a target, ignoring walls and blocks.
    ///
    /// Teleporting onto a block removes it and reveals its item, so the
    /// player never ends up inside an obstacle.
    pub fn teleport_to(&mut self, target: CheatTarget) -> StarMazeResult<Vec<GameEvent>> {
        let destination = match target {
            CheatTarget::Star => self
                .objects
                .stars
                .iter()
                .find(|s| !s.solved)
                .map(|s| s.position),
            CheatTarget::Ship => self.objects.item_position(HiddenItem::Ship),
            CheatTarget::ExitPortal => self.objects.item_position(HiddenItem::Portal),
            CheatTarget::SpawnPortal => self.objects.spawn_portal,
            CheatTarget::Block => self.objects.blocks.first().map(|b| b.position),
        };

        let Some(destination) = destination else {
            info!("Cheat: no {:?} to teleport to", target);
            return Ok(Vec::new());
        };

        let mut events = Vec::new();
        if let Some(index) = self.objects.block_at(destination) {
            let block = self.objects.blocks.remove(index);
            events.push(GameEvent::BlockDestroyed { position: destination });
            if let Some(item) = block.hidden_item {
                self.objects.reveal(item);
                events.push(GameEvent::ItemRevealed {
                    item,
                    position: destination,
                });
            }
        }

        let from = self.player;
        self.player = destination;
        info!("Cheat: teleported {:?} -> {:?}", from, destination);
        events.push(GameEvent::PlayerMoved {
            from,
            to: destination,
        });
        Ok(events)
    }

    /// Puts the ship in the player's pocket.
    pub fn grant_ship(&mut self) -> Vec<GameEvent> {
        if self.session.has_ship {
            return Vec::new();
        }
        self.session.has_ship = true;
        let position = match self.objects.ship.as_mut() {
            Some(ship) => {
                ship.collected = true;
                ship.hidden = true;
                ship.position
            }
            None => self.player,
        };
        info!("Cheat: ship granted");
        vec![GameEvent::ShipCollected { position }]
    }

    /// Solves every remaining star, awarding the usual points.
    pub fn solve_all_stars(&mut self) -> Vec<GameEvent> {
        if self.is_completed() {
            return Vec::new();
        }
        self.challenge = None;
        let events: Vec<GameEvent> = (0..self.objects.stars.len())
            .filter_map(|star| self.solve_star(star))
            .collect();
        info!("Cheat: solved {} stars", events.len());
        events
    }

    /// Launches a comet immediately.
    pub fn spawn_comet(&mut self) -> Vec<GameEvent> {
        self.launch_comet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, GenerationConfig};
    use std::time::Duration;

    fn game() -> GameState {
        let config = GameConfig::default();
        let generation = GenerationConfig::from_game_config(&config, 99, 24, 18);
        let mut game = GameState::generate(config, generation).unwrap();
        game.start(Duration::ZERO);
        game
    }

    #[test]
    fn test_reveal_all() {
        let mut game = game();
        let hidden = game.objects.hidden_item_count();
        let events = game.reveal_all();
        assert_eq!(events.len(), hidden);
        assert!(game.objects.stars.iter().all(|s| !s.hidden));
        // Blocks stay standing
        assert_eq!(game.objects.hidden_item_count(), hidden);
    }

    #[test]
    fn test_teleport_onto_block_clears_it() {
        let mut game = game();
        let blocks = game.objects.blocks.len();
        let events = game.teleport_to(CheatTarget::Star).unwrap();
        let star = game.objects.stars[0].position;

        assert_eq!(game.player, star);
        assert!(!game.objects.has_block_at(star));
        assert_eq!(game.objects.blocks.len(), blocks - 1);
        assert!(events.contains(&GameEvent::ItemRevealed {
            item: HiddenItem::Star(0),
            position: star
        }));
        assert_eq!(game.objects.open_star_at(star), Some(0));
    }

    #[test]
    fn test_cheated_win() {
        let mut game = game();
        game.solve_all_stars();
        game.grant_ship();
        assert_eq!(game.session.score, 50);
        assert!(game.grant_ship().is_empty());

        // Keep neighbouring blocks from taking the action
        game.reveal_all();
        game.objects.blocks.clear();
        game.teleport_to(CheatTarget::ExitPortal).unwrap();
        let events = game.perform_action().unwrap();
        assert_eq!(events, vec![GameEvent::GameCompleted { score: 50 }]);
        assert!(game.is_completed());
    }

    #[test]
    fn test_spawn_comet() {
        let mut game = game();
        let events = game.spawn_comet();
        assert!(matches!(events[0], GameEvent::CometLaunched { .. }));
        assert_eq!(game.active_comets().len(), 1);
    }
}
