use log::{debug, warn};
use rand::Rng;

use super::{
    action::Direction,
    food::place_food,
    grid::Grid,
    snake::Snake,
    state::{Collision, Vector2},
};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The snake moved without eating
    Continue,
    /// The snake moved onto the food and grew
    AteFood,
    /// The snake hit a wall or itself; the playfield is frozen
    GameOver(Collision),
}

impl TickResult {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickResult::GameOver(_))
    }
}

/// Everything a tick mutates: the snake, both directions, food and score
#[derive(Debug, Clone, PartialEq)]
pub struct Playfield {
    pub snake: Snake,
    /// Direction committed at the start of the last tick
    pub direction: Direction,
    /// Direction to commit at the start of the next tick
    pub queued_direction: Direction,
    pub food: Vector2,
    pub score: u32,
}

impl Playfield {
    pub fn new(snake: Snake, direction: Direction, food: Vector2) -> Self {
        Self {
            snake,
            direction,
            queued_direction: direction,
            food,
            score: 0,
        }
    }

    /// Overwrite the queued direction unless it reverses the committed one.
    /// Returns whether the input was taken.
    pub fn queue(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.queued_direction = direction;
        true
    }
}

/// Advance the playfield by one tick.
///
/// Collisions are checked against the body as it is before the move, so a head
/// entering the cell the tail is about to leave still counts as a collision.
/// On `GameOver` nothing is mutated apart from the committed direction.
pub fn tick<R: Rng>(field: &mut Playfield, grid: &Grid, rng: &mut R) -> TickResult {
    field.direction = field.queued_direction;

    let new_head = field.snake.advance(field.direction);

    if let Some(collision) = check_collision(field, grid, new_head) {
        debug!("collision {:?} at ({}, {})", collision, new_head.x, new_head.y);
        return TickResult::GameOver(collision);
    }

    if new_head == field.food {
        field.snake.grow(new_head);
        field.score += 1;
        match place_food(rng, &field.snake, grid) {
            Some(food) => field.food = food,
            // Board is full: food stays under the head and the next tick ends the game
            None => warn!("no free cell left for food at length {}", field.snake.len()),
        }
        return TickResult::AteFood;
    }

    field.snake.move_to(new_head);
    TickResult::Continue
}

/// Check if the new head position causes a collision
fn check_collision(field: &Playfield, grid: &Grid, pos: Vector2) -> Option<Collision> {
    if !grid.in_bounds(pos) {
        return Some(Collision::Wall);
    }

    if field.snake.occupies(pos) {
        return Some(Collision::SelfCollision);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn v(x: i32, y: i32) -> Vector2 {
        Vector2::new(x, y)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn playfield(segments: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> Playfield {
        let snake = Snake::from_segments(segments.iter().map(|&p| Vector2::from(p))).unwrap();
        Playfield::new(snake, direction, food.into())
    }

    #[test]
    fn test_basic_movement() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(5, 12), (4, 12), (3, 12)], Direction::Right, (15, 3));

        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::Continue);
        assert_eq!(field.snake.segments(), &[v(6, 12), v(5, 12), v(4, 12)]);
        assert_eq!(field.score, 0);
        assert_eq!(field.food, v(15, 3));
    }

    #[test]
    fn test_queued_direction_committed_at_tick() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 3));

        assert!(field.queue(Direction::Up));
        assert_eq!(field.direction, Direction::Right);

        tick(&mut field, &grid, &mut rng());
        assert_eq!(field.direction, Direction::Up);
        assert_eq!(field.snake.head(), v(5, 4));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 3));

        assert!(!field.queue(Direction::Left));
        assert_eq!(field.queued_direction, Direction::Right);

        let result = tick(&mut field, &grid, &mut rng());
        assert_eq!(result, TickResult::Continue);
        assert_eq!(field.snake.head(), v(6, 5));
    }

    #[test]
    fn test_last_queued_input_wins() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 3));

        field.queue(Direction::Up);
        field.queue(Direction::Down);

        tick(&mut field, &grid, &mut rng());
        assert_eq!(field.snake.head(), v(5, 6));
    }

    #[test]
    fn test_reverse_checked_against_committed_not_queued() {
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 3));

        // Up is queued but Right is still committed, so Down is a legal turn
        field.queue(Direction::Up);
        assert!(field.queue(Direction::Down));
        assert_eq!(field.queued_direction, Direction::Down);
    }

    #[test]
    fn test_food_consumption() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (6, 5));

        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::AteFood);
        assert_eq!(field.score, 1);
        assert_eq!(field.snake.segments(), &[v(6, 5), v(5, 5), v(4, 5), v(3, 5)]);
        assert!(grid.in_bounds(field.food));
        assert!(!field.snake.occupies(field.food));
    }

    #[test]
    fn test_wall_collision() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(19, 12), (18, 12), (17, 12)], Direction::Right, (0, 0));
        let before = field.clone();

        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::GameOver(Collision::Wall));
        assert_eq!(field, before);
    }

    #[test]
    fn test_wall_collision_on_every_side() {
        let grid = Grid::new(3);
        let cases = [
            ((0, 1), Direction::Left),
            ((2, 1), Direction::Right),
            ((1, 0), Direction::Up),
            ((1, 2), Direction::Down),
        ];

        for (head, direction) in cases {
            let mut field = playfield(&[head], direction, (1, 1));
            let result = tick(&mut field, &grid, &mut rng());
            assert_eq!(result, TickResult::GameOver(Collision::Wall), "{direction:?}");
        }
    }

    #[test]
    fn test_self_collision() {
        let grid = Grid::new(10);
        // Length 4 heading right; turning down, left, up runs into the old body
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5), (2, 5)], Direction::Right, (8, 8));

        assert_eq!(tick(&mut field, &grid, &mut rng()), TickResult::Continue);
        field.queue(Direction::Down);
        assert_eq!(tick(&mut field, &grid, &mut rng()), TickResult::Continue);
        field.queue(Direction::Left);
        assert_eq!(tick(&mut field, &grid, &mut rng()), TickResult::Continue);
        // Body is now (5,6), (6,6), (6,5), (5,5)
        field.queue(Direction::Up);
        let len = field.snake.len();
        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::GameOver(Collision::SelfCollision));
        assert_eq!(field.snake.len(), len);
    }

    #[test]
    fn test_turning_into_second_segment() {
        let grid = Grid::new(10);
        let mut field = playfield(&[(5, 5), (4, 5), (3, 5), (2, 5)], Direction::Right, (8, 8));

        // Bypass the reverse filter to force the head onto the neck
        field.queued_direction = Direction::Left;
        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::GameOver(Collision::SelfCollision));
        assert_eq!(field.snake.segments(), &[v(5, 5), v(4, 5), v(3, 5), v(2, 5)]);
    }

    #[test]
    fn test_outgoing_tail_cell_counts_as_collision() {
        let grid = Grid::new(10);
        // A 2x2 loop: the head's next cell is the tail that would move away
        let mut field = playfield(&[(1, 1), (2, 1), (2, 2), (1, 2)], Direction::Down, (8, 8));

        let result = tick(&mut field, &grid, &mut rng());

        assert_eq!(result, TickResult::GameOver(Collision::SelfCollision));
    }

    #[test]
    fn test_eating_last_free_cell_keeps_food_under_head() {
        let grid = Grid::new(2);
        let mut field = playfield(&[(0, 0), (1, 0), (1, 1)], Direction::Down, (0, 1));

        assert_eq!(tick(&mut field, &grid, &mut rng()), TickResult::AteFood);
        assert_eq!(field.snake.len(), grid.area());
        assert_eq!(field.food, v(0, 1));

        // No cell left to move into
        assert!(tick(&mut field, &grid, &mut rng()).is_game_over());
    }

    #[test]
    fn test_head_moves_by_unit_vector_each_tick() {
        let grid = Grid::new(20);
        let mut field = playfield(&[(10, 10), (9, 10), (8, 10)], Direction::Right, (0, 0));
        let mut rng = rng();
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

        for turn in turns.iter().cycle().take(12) {
            field.queue(*turn);
            let old_head = field.snake.head();
            let old_len = field.snake.len();
            match tick(&mut field, &grid, &mut rng) {
                TickResult::Continue => assert_eq!(field.snake.len(), old_len),
                TickResult::AteFood => assert_eq!(field.snake.len(), old_len + 1),
                TickResult::GameOver(_) => break,
            }
            assert_eq!(field.snake.head(), old_head + field.direction.delta());
        }
    }
}
