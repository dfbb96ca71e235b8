//! # Game Objects
//!
//! Destructible blocks and the rewards hidden behind them.
//!
//! A block takes two hits. The first only cracks it; the second removes it from
//! the board and reveals whatever it was hiding. Stars, the ship and the exit
//! portal all start hidden and only become interactable once revealed.

use crate::game::Position;
use crate::{StarMazeError, StarMazeResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Hits a block absorbs before it breaks.
pub const BLOCK_HITS_TO_DESTROY: u8 = 2;

/// Item concealed by a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HiddenItem {
    /// Index into [`GameObjects::stars`]
    Star(usize),
    Ship,
    Portal,
}

/// A destructible obstacle occupying one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub position: Position,
    /// 0 = intact, 1 = cracked
    pub hits: u8,
    pub hidden_item: Option<HiddenItem>,
}

impl Block {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            hits: 0,
            hidden_item: None,
        }
    }

    pub fn is_cracked(&self) -> bool {
        self.hits > 0
    }
}

/// Outcome of hitting a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockHit {
    /// First hit: visual change only
    Cracked { position: Position },
    /// Second hit: the block is gone and its item, if any, is now visible
    Destroyed {
        position: Position,
        revealed: Option<HiddenItem>,
    },
}

/// A star guarded by a question challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub position: Position,
    pub solved: bool,
    pub hidden: bool,
}

/// The flying saucer the player has to pocket before leaving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub position: Position,
    pub hidden: bool,
    pub collected: bool,
}

/// The exit portal that ends the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub position: Position,
    pub hidden: bool,
    pub activated: bool,
}

/// Every object placed on the board for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObjects {
    /// Blocks still standing
    pub blocks: Vec<Block>,
    pub stars: Vec<Star>,
    pub ship: Option<Ship>,
    pub portal: Option<Portal>,
    /// Portal marking the spawn cell; `None` once it has expired
    pub spawn_portal: Option<Position>,
}

impl GameObjects {
    /// Creates an empty board with only the spawn portal.
    pub fn new(spawn: Position) -> Self {
        Self {
            blocks: Vec::new(),
            stars: Vec::new(),
            ship: None,
            portal: None,
            spawn_portal: Some(spawn),
        }
    }

    /// Index of the standing block at `pos`.
    pub fn block_at(&self, pos: Position) -> Option<usize> {
        self.blocks.iter().position(|b| b.position == pos)
    }

    pub fn has_block_at(&self, pos: Position) -> bool {
        self.block_at(pos).is_some()
    }

    /// Hides a star behind the block at `index`.
    pub fn hide_star(&mut self, index: usize) -> StarMazeResult<()> {
        let star_index = self.stars.len();
        let block = self.block_for_hiding(index)?;
        block.hidden_item = Some(HiddenItem::Star(star_index));
        let position = block.position;
        self.stars.push(Star {
            position,
            solved: false,
            hidden: true,
        });
        Ok(())
    }

    /// Hides the ship behind the block at `index`.
    pub fn hide_ship(&mut self, index: usize) -> StarMazeResult<()> {
        if self.ship.is_some() {
            return Err(StarMazeError::InvalidState("ship already placed".to_string()));
        }
        let block = self.block_for_hiding(index)?;
        block.hidden_item = Some(HiddenItem::Ship);
        let position = block.position;
        self.ship = Some(Ship {
            position,
            hidden: true,
            collected: false,
        });
        Ok(())
    }

    /// Hides the exit portal behind the block at `index`.
    pub fn hide_portal(&mut self, index: usize) -> StarMazeResult<()> {
        if self.portal.is_some() {
            return Err(StarMazeError::InvalidState("portal already placed".to_string()));
        }
        let block = self.block_for_hiding(index)?;
        block.hidden_item = Some(HiddenItem::Portal);
        let position = block.position;
        self.portal = Some(Portal {
            position,
            hidden: true,
            activated: false,
        });
        Ok(())
    }

    fn block_for_hiding(&mut self, index: usize) -> StarMazeResult<&mut Block> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or_else(|| StarMazeError::InvalidState(format!("no block at index {}", index)))?;
        if block.hidden_item.is_some() {
            return Err(StarMazeError::InvalidState(format!(
                "block at {:?} already hides an item",
                block.position
            )));
        }
        Ok(block)
    }

    /// Applies one hit to the block at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{Block, BlockHit, GameObjects, Position};
    ///
    /// let mut objects = GameObjects::new(Position::new(1, 1));
    /// objects.blocks.push(Block::new(Position::new(3, 3)));
    ///
    /// let first = objects.hit_block(0).unwrap();
    /// assert_eq!(first, BlockHit::Cracked { position: Position::new(3, 3) });
    /// assert_eq!(objects.blocks.len(), 1);
    ///
    /// let second = objects.hit_block(0).unwrap();
    /// assert!(matches!(second, BlockHit::Destroyed { revealed: None, .. }));
    /// assert!(objects.blocks.is_empty());
    /// ```
    pub fn hit_block(&mut self, index: usize) -> StarMazeResult<BlockHit> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or_else(|| StarMazeError::InvalidAction(format!("no block at index {}", index)))?;

        block.hits += 1;
        if block.hits < BLOCK_HITS_TO_DESTROY {
            debug!("Block at {:?} cracked", block.position);
            return Ok(BlockHit::Cracked {
                position: block.position,
            });
        }

        let block = self.blocks.remove(index);
        let revealed = block.hidden_item;
        if let Some(item) = revealed {
            self.reveal(item);
        }
        debug!("Block at {:?} destroyed, revealed {:?}", block.position, revealed);
        Ok(BlockHit::Destroyed {
            position: block.position,
            revealed,
        })
    }

    /// Makes a hidden item visible.
    pub fn reveal(&mut self, item: HiddenItem) {
        match item {
            HiddenItem::Star(index) => match self.stars.get_mut(index) {
                Some(star) if !star.solved => star.hidden = false,
                Some(_) => {}
                None => warn!("Revealed star {} does not exist", index),
            },
            HiddenItem::Ship => match self.ship.as_mut() {
                Some(ship) if !ship.collected => ship.hidden = false,
                Some(_) => {}
                None => warn!("Revealed ship does not exist"),
            },
            HiddenItem::Portal => match self.portal.as_mut() {
                Some(portal) => portal.hidden = false,
                None => warn!("Revealed portal does not exist"),
            },
        }
    }

    /// Position of the item, whether hidden or not.
    pub fn item_position(&self, item: HiddenItem) -> Option<Position> {
        match item {
            HiddenItem::Star(index) => self.stars.get(index).map(|s| s.position),
            HiddenItem::Ship => self.ship.as_ref().map(|s| s.position),
            HiddenItem::Portal => self.portal.as_ref().map(|p| p.position),
        }
    }

    /// Index of a visible, unsolved star at `pos`.
    pub fn open_star_at(&self, pos: Position) -> Option<usize> {
        self.stars
            .iter()
            .position(|s| s.position == pos && !s.hidden && !s.solved)
    }

    /// Whether a visible, uncollected ship sits at `pos`.
    pub fn collectable_ship_at(&self, pos: Position) -> bool {
        self.ship
            .as_ref()
            .map_or(false, |s| s.position == pos && !s.hidden && !s.collected)
    }

    /// Whether the visible exit portal sits at `pos`.
    pub fn visible_portal_at(&self, pos: Position) -> bool {
        self.portal
            .as_ref()
            .map_or(false, |p| p.position == pos && !p.hidden)
    }

    /// Number of blocks currently hiding something.
    pub fn hidden_item_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.hidden_item.is_some()).count()
    }

    pub fn unsolved_star_count(&self) -> usize {
        self.stars.iter().filter(|s| !s.solved).count()
    }

    pub fn all_stars_solved(&self) -> bool {
        self.stars.iter().all(|s| s.solved)
    }
}
