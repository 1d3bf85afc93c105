//! Food placement on a free grid cell

use rand::Rng;

use super::grid::Grid;
use super::snake::Snake;
use super::state::Vector2;

/// Pick a uniformly random cell not covered by the snake.
///
/// Samples until it hits a free cell, so it always makes progress while at
/// least one cell is free. Returns `None` when the snake covers the whole grid.
pub fn place_food<R: Rng>(rng: &mut R, snake: &Snake, grid: &Grid) -> Option<Vector2> {
    let occupied = snake
        .segments()
        .iter()
        .filter(|&&segment| grid.in_bounds(segment))
        .count();
    if occupied >= grid.area() {
        return None;
    }

    let n = i32::try_from(grid.tile_count()).ok()?;
    loop {
        let pos = Vector2::new(rng.gen_range(0..n), rng.gen_range(0..n));
        if !snake.occupies(pos) {
            return Some(pos);
        }
    }
}
