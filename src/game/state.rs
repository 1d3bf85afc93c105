use serde::{Deserialize, Serialize};
use std::ops::Add;

/// An integer pair on the game grid, used for both positions and directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, used to check that body segments touch
    pub fn manhattan(&self, other: Vector2) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(i32, i32)> for Vector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Not started yet
    Idle,
    /// Tick timer active
    Running,
    /// Game over, timer cancelled, score frozen
    Stopped,
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Snapshot handed to the presentation layer after every tick and reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableState {
    /// Snake segments, head first
    pub segments: Vec<Vector2>,
    pub food: Vector2,
    pub score: u32,
    pub state: SessionState,
    pub tile_count: u32,
    /// What ended the last game, if it has ended
    pub collision: Option<Collision>,
}

impl RenderableState {
    pub fn head(&self) -> Option<Vector2> {
        self.segments.first().copied()
    }

    pub fn is_snake(&self, pos: Vector2) -> bool {
        self.segments.contains(&pos)
    }
}
