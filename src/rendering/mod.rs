//! # Rendering Module
//!
//! 2D rendering of the maze and its overlays with macroquad.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
