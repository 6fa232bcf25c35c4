//! Snake body, movement and growth.

use std::collections::VecDeque;

use snake_portal_core::{CellCoord, Direction, GridGeometry};

/// Ordered, head-first body plus heading and queued growth.
///
/// The head is stored apart from the trailing segments so the body can never
/// be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Snake {
    head: CellCoord,
    tail: VecDeque<CellCoord>,
    direction: Direction,
    pending_growth: u32,
}

impl Snake {
    /// Creates a horizontal snake with its head on `head`, heading right.
    pub(crate) fn new(head: CellCoord, length: usize) -> Self {
        let mut snake = Self {
            head,
            tail: VecDeque::new(),
            direction: Direction::Right,
            pending_growth: 0,
        };
        snake.lay_out(head, Direction::Right, length.max(1));
        snake
    }

    /// Creates the starting snake centred on the grid.
    pub(crate) fn centered(grid: GridGeometry, length: usize) -> Self {
        Self::new(grid.center(), length)
    }

    /// Moves the head one cell forward, keeping the tail while growth is queued.
    ///
    /// Out-of-grid heads are legal here; bounds are judged by the caller.
    pub(crate) fn advance(&mut self) {
        let previous = self.head;
        self.head = previous.offset(self.direction);
        self.tail.push_front(previous);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            let _ = self.tail.pop_back();
        }
    }

    /// Turns toward `direction` unless it reverses the current heading.
    pub(crate) fn change_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Queues one cell of growth for a later move.
    pub(crate) fn grow(&mut self) {
        self.pending_growth = self.pending_growth.saturating_add(1);
    }

    /// Reports whether the head lies outside the grid.
    pub(crate) fn check_wall_collision(&self, grid: GridGeometry) -> bool {
        !grid.contains(self.head())
    }

    /// Reports whether the head overlaps another segment.
    pub(crate) fn check_self_collision(&self) -> bool {
        self.tail.contains(&self.head)
    }

    /// Rebuilds the body as a straight line behind `head`, preserving length
    /// and queued growth.
    pub(crate) fn reenter(&mut self, head: CellCoord, direction: Direction) {
        let length = self.len();
        self.lay_out(head, direction, length);
    }

    pub(crate) fn head(&self) -> CellCoord {
        self.head
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub(crate) fn len(&self) -> usize {
        self.tail.len() + 1
    }

    /// Body cells, head first.
    pub(crate) fn segments(&self) -> impl Iterator<Item = CellCoord> + '_ {
        std::iter::once(self.head).chain(self.tail.iter().copied())
    }

    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.head == cell || self.tail.contains(&cell)
    }

    fn lay_out(&mut self, head: CellCoord, direction: Direction, length: usize) {
        let trailing = direction.opposite();
        self.head = head;
        self.tail.clear();
        let mut cell = head;
        for _ in 1..length {
            cell = cell.offset(trailing);
            self.tail.push_back(cell);
        }
        self.direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_snake_starts_heading_right() {
        let snake = Snake::centered(GridGeometry::STANDARD, 3);
        let body: Vec<CellCoord> = snake.segments().collect();
        assert_eq!(
            body,
            vec![
                CellCoord::new(20, 15),
                CellCoord::new(19, 15),
                CellCoord::new(18, 15)
            ]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert!(!snake.check_self_collision());
        assert!(!snake.check_wall_collision(GridGeometry::STANDARD));
    }

    #[test]
    fn reversal_is_rejected_for_every_direction() {
        for direction in Direction::ALL {
            let mut snake = Snake::centered(GridGeometry::STANDARD, 3);
            let _ = snake.change_direction(Direction::Up);
            let _ = snake.change_direction(Direction::Left);
            let _ = snake.change_direction(direction);
            let settled = snake.direction();
            assert!(!snake.change_direction(settled.opposite()));
            assert_eq!(snake.direction(), settled);
        }
    }

    #[test]
    fn move_without_growth_keeps_length() {
        let mut snake = Snake::centered(GridGeometry::STANDARD, 3);
        snake.advance();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), CellCoord::new(21, 15));
    }

    #[test]
    fn growth_accumulates_across_moves() {
        let mut snake = Snake::centered(GridGeometry::STANDARD, 3);
        snake.grow();
        snake.grow();
        snake.advance();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.pending_growth(), 1);
        snake.advance();
        assert_eq!(snake.len(), 5);
        snake.advance();
        assert_eq!(snake.len(), 5);
    }

    #[test]
    fn head_may_leave_the_grid() {
        let mut snake = Snake::new(CellCoord::new(39, 0), 3);
        snake.advance();
        assert_eq!(snake.head(), CellCoord::new(40, 0));
        assert!(snake.check_wall_collision(GridGeometry::STANDARD));
    }

    #[test]
    fn turning_back_into_the_body_collides() {
        let mut snake = Snake::new(CellCoord::new(10, 10), 5);
        assert!(snake.change_direction(Direction::Down));
        snake.advance();
        assert!(snake.change_direction(Direction::Left));
        snake.advance();
        assert!(snake.change_direction(Direction::Up));
        snake.advance();
        assert!(snake.check_self_collision());
    }

    #[test]
    fn reenter_preserves_length_and_growth() {
        let mut snake = Snake::centered(GridGeometry::STANDARD, 4);
        snake.grow();
        snake.reenter(CellCoord::new(20, 29), Direction::Up);
        let body: Vec<CellCoord> = snake.segments().collect();
        assert_eq!(body.len(), 4);
        assert_eq!(body[0], CellCoord::new(20, 29));
        assert_eq!(body[3], CellCoord::new(20, 32));
        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(snake.pending_growth(), 1);
    }
}
