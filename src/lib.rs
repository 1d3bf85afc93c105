//! Grid Snake - a fixed-tick snake game for the terminal
//!
//! This library provides:
//! - Core game logic and session state machine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Per-run play statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
