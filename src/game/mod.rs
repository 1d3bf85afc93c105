//! Core game logic module for Snake
//!
//! This module contains all the game logic without any terminal or rendering
//! dependencies. The presentation layer drives a [`GameSession`] and reads its
//! [`RenderableState`] snapshots.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod scheduler;
pub mod session;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{Playfield, TickResult, tick};
pub use food::place_food;
pub use grid::{Grid, MAX_TILE_COUNT};
pub use scheduler::{
    ManualScheduler, ScheduleLog, Scheduler, TickEvent, TickHandle, TickTask, TokioScheduler,
};
pub use session::GameSession;
pub use snake::Snake;
pub use state::{Collision, RenderableState, SessionState, Vector2};
