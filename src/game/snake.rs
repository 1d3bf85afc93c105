use super::action::Direction;
use super::state::Vector2;

/// The snake's body, head at index 0 and tail last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Vector2>,
}

impl Snake {
    /// Create a snake from explicit segments, head first.
    /// Returns `None` for an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = Vector2>) -> Option<Self> {
        let body: Vec<Vector2> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self { body })
    }

    /// Get the head position
    pub fn head(&self) -> Vector2 {
        self.body[0]
    }

    pub fn segments(&self) -> &[Vector2] {
        &self.body
    }

    /// True if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Vector2) -> bool {
        self.body.contains(&pos)
    }

    /// Where the head would land moving one cell in `direction`
    pub fn advance(&self, direction: Direction) -> Vector2 {
        self.head() + direction.delta()
    }

    /// Prepend a new head, keeping the tail. Length grows by one.
    pub fn grow(&mut self, new_head: Vector2) {
        self.body.insert(0, new_head);
    }

    /// Prepend a new head and drop the tail. Length is unchanged.
    pub fn move_to(&mut self, new_head: Vector2) {
        self.body.insert(0, new_head);
        self.body.pop();
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// The body is non-empty by construction, see [`Snake::from_segments`]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vector2 {
        Vector2::new(x, y)
    }

    fn snake() -> Snake {
        Snake::from_segments([v(5, 5), v(4, 5), v(3, 5)]).unwrap()
    }

    #[test]
    fn test_snake_creation() {
        let snake = snake();
        assert_eq!(snake.len(), 3);
        assert!(!snake.is_empty());
        assert_eq!(snake.head(), v(5, 5));
        assert_eq!(snake.segments(), &[v(5, 5), v(4, 5), v(3, 5)]);
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        assert!(Snake::from_segments(Vec::new()).is_none());
        let snake = Snake::from_segments([v(2, 2)]).unwrap();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), v(2, 2));
    }

    #[test]
    fn test_advance_adds_unit_vector() {
        let snake = snake();
        assert_eq!(snake.advance(Direction::Right), v(6, 5));
        assert_eq!(snake.advance(Direction::Up), v(5, 4));
        assert_eq!(snake.advance(Direction::Down), v(5, 6));
        // advance only computes; the body is untouched
        assert_eq!(snake.head(), v(5, 5));
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = snake();

        let head = snake.advance(Direction::Right);
        snake.move_to(head);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.segments(), &[v(6, 5), v(5, 5), v(4, 5)]);

        let head = snake.advance(Direction::Right);
        snake.grow(head);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.segments(), &[v(7, 5), v(6, 5), v(5, 5), v(4, 5)]);
    }

    #[test]
    fn test_occupies() {
        let snake = snake();
        assert!(snake.occupies(v(5, 5))); // head
        assert!(snake.occupies(v(4, 5))); // body
        assert!(snake.occupies(v(3, 5))); // tail
        assert!(!snake.occupies(v(10, 10)));
    }
}
