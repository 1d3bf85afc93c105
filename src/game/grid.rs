//! Bounded square coordinate space of the board

use serde::{Deserialize, Serialize};

use super::state::Vector2;

/// Largest board accepted by configuration, in tiles per side
pub const MAX_TILE_COUNT: u32 = 256;

/// A square grid of `tile_count` cells per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    tile_count: u32,
}

impl Grid {
    pub fn new(tile_count: u32) -> Self {
        Self { tile_count }
    }

    /// Grid for a board of `board_size` pixels cut into `tile_size` pixel tiles.
    /// Returns `None` for a zero tile size.
    pub fn from_board(board_size: u32, tile_size: u32) -> Option<Self> {
        board_size.checked_div(tile_size).map(Self::new)
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        let n = self.tile_count as usize;
        n * n
    }

    /// True iff 0 <= x < N and 0 <= y < N
    pub fn in_bounds(&self, pos: Vector2) -> bool {
        let n = i64::from(self.tile_count);
        (0..n).contains(&i64::from(pos.x)) && (0..n).contains(&i64::from(pos.y))
    }
}
