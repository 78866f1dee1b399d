#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use roster::*;
pub use sheet::*;
pub use tile::*;
pub use tracker::*;
pub use types::*;

mod error;
mod roster;
mod sheet;
mod tile;
mod tracker;
mod types;

/// Sheet dimensions applied to players created from now on; existing players
/// keep the sheet they were created with.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub size: Coord,
}

impl SheetConfig {
    pub const DEFAULT_SIZE: Coord = 4;

    pub const fn new_unchecked(size: Coord) -> Self {
        Self { size }
    }

    pub fn new(size: Coord) -> Self {
        Self::new_unchecked(size.clamp(1, Coord::MAX))
    }

    pub const fn total_tiles(&self) -> TileCount {
        square(self.size)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE)
    }
}
