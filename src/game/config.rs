use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use super::{
    action::Direction,
    grid::{Grid, MAX_TILE_COUNT},
    snake::Snake,
    state::Vector2,
};

/// Configuration for the game
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "tick_interval_ms": 90, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square board in pixels
    pub board_size: u32,
    /// Side of one tile in pixels
    pub tile_size: u32,
    /// Time between two simulation ticks
    pub tick_interval_ms: u64,
    /// Body of a freshly started snake, head first
    pub initial_snake: Vec<Vector2>,
    /// Direction a freshly started snake moves in
    pub initial_direction: Direction,
    /// Fixed seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 400,
            tile_size: 20,
            tick_interval_ms: 120,
            initial_snake: vec![
                Vector2::new(5, 12),
                Vector2::new(4, 12),
                Vector2::new(3, 12),
            ],
            initial_direction: Direction::Right,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON configuration file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of tiles per side
    pub fn tile_count(&self) -> u32 {
        self.grid().map(|grid| grid.tile_count()).unwrap_or(0)
    }

    pub fn grid(&self) -> Option<Grid> {
        Grid::from_board(self.board_size, self.tile_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The snake every game starts with
    pub fn initial_snake(&self) -> Result<Snake> {
        Snake::from_segments(self.initial_snake.iter().copied())
            .context("Initial snake must have at least one segment")
    }

    /// Check the configuration describes a playable board
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tile_size > 0, "Tile size must be positive");
        ensure!(
            self.board_size % self.tile_size == 0,
            "Board size {} is not a multiple of tile size {}",
            self.board_size,
            self.tile_size
        );
        let grid = Grid::new(self.board_size / self.tile_size);
        ensure!(grid.tile_count() > 0, "Board must hold at least one tile");
        ensure!(
            grid.tile_count() <= MAX_TILE_COUNT,
            "Board of {} tiles per side exceeds the limit of {}",
            grid.tile_count(),
            MAX_TILE_COUNT
        );
        ensure!(self.tick_interval_ms > 0, "Tick interval must be positive");

        let body = &self.initial_snake;
        ensure!(!body.is_empty(), "Initial snake must have at least one segment");
        ensure!(
            body.len() < grid.area(),
            "Initial snake of length {} leaves no room for food on a {}x{} grid",
            body.len(),
            grid.tile_count(),
            grid.tile_count()
        );

        let mut seen = HashSet::new();
        for &segment in body {
            ensure!(
                grid.in_bounds(segment),
                "Initial segment ({}, {}) is outside the grid",
                segment.x,
                segment.y
            );
            ensure!(
                seen.insert(segment),
                "Initial segment ({}, {}) appears twice",
                segment.x,
                segment.y
            );
        }
        ensure!(
            body.windows(2).all(|pair| pair[0].manhattan(pair[1]) == 1),
            "Initial snake segments must be adjacent"
        );

        if let &[head, neck, ..] = body.as_slice() {
            ensure!(
                head + self.initial_direction.delta() != neck,
                "Initial direction {:?} points back into the snake",
                self.initial_direction
            );
        }

        Ok(())
    }
}
