#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering system that plays the game by emitting direction inputs.
//!
//! The autopilot reads a [`SessionSnapshot`] and chases the food along a
//! shortest path, switching to the portal as soon as it opens. It never
//! issues anything other than movement inputs and only acts while the
//! session is playing.

mod field;

use std::collections::HashSet;

use snake_portal_core::{CellCoord, Command, Direction, GameState, PlayerInput, SessionSnapshot};

use crate::field::DistanceField;

/// Pure system that turns snapshots into steering commands.
#[derive(Debug, Default)]
pub struct Autopilot {
    field: DistanceField,
    last_tick: Option<u64>,
}

impl Autopilot {
    /// Creates an autopilot that has not steered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits at most one direction input for the tick described by `snapshot`.
    pub fn handle(&mut self, snapshot: &SessionSnapshot, out: &mut Vec<Command>) {
        if snapshot.state != GameState::Playing || snapshot.terminated {
            return;
        }
        if self.last_tick == Some(snapshot.tick_index) {
            return;
        }
        self.last_tick = Some(snapshot.tick_index);

        let Some(direction) = self.choose(snapshot) else {
            return;
        };
        if direction != snapshot.direction {
            out.push(Command::Input {
                input: PlayerInput::steer(direction),
            });
        }
    }

    fn choose(&mut self, snapshot: &SessionSnapshot) -> Option<Direction> {
        let head = snapshot.head()?;
        if head.row() < 0 {
            return Some(Direction::Up);
        }

        let portal = snapshot.portal;
        let in_span = |cell: CellCoord| {
            (portal.first_column..=portal.last_column).contains(&cell.column())
        };
        if portal.open && head.row() == 0 && in_span(head) {
            return Some(Direction::Up);
        }

        let blocked = blocked_cells(snapshot);
        let is_blocked = |cell: CellCoord| blocked.contains(&cell);

        let goals: Vec<CellCoord> = if portal.open {
            (portal.first_column..=portal.last_column)
                .map(|column| CellCoord::new(column, 0))
                .collect()
        } else {
            snapshot.food.into_iter().collect()
        };
        self.field.rebuild_with(snapshot.grid, &goals, is_blocked);

        let safe_moves: Vec<(Direction, CellCoord)> = candidate_directions(snapshot.direction)
            .map(|direction| (direction, head.offset(direction)))
            .filter(|(_, cell)| snapshot.grid.contains(*cell) && !is_blocked(*cell))
            .collect();

        safe_moves
            .iter()
            .filter_map(|(direction, cell)| {
                self.field
                    .distance(*cell)
                    .map(|distance| (distance, *direction))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, direction)| direction)
            .or_else(|| safe_moves.first().map(|(direction, _)| *direction))
            .or(Some(snapshot.direction))
    }
}

/// Cells the head must avoid on its next move.
///
/// The last body segment is left out because it moves away on the same tick.
fn blocked_cells(snapshot: &SessionSnapshot) -> HashSet<CellCoord> {
    let body_len = snapshot.body.len();
    snapshot
        .obstacles
        .iter()
        .copied()
        .chain(
            snapshot
                .body
                .iter()
                .take(body_len.saturating_sub(1))
                .copied(),
        )
        .collect()
}

/// Non-reversing directions, current heading first so ties keep going straight.
fn candidate_directions(current: Direction) -> impl Iterator<Item = Direction> {
    std::iter::once(current).chain(
        Direction::ALL
            .into_iter()
            .filter(move |direction| *direction != current && *direction != current.opposite()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_portal_core::{GridGeometry, Level, PortalView, Speed, APPLES_PER_LEVEL};

    fn snapshot(body: Vec<CellCoord>, direction: Direction) -> SessionSnapshot {
        SessionSnapshot {
            state: GameState::Playing,
            body,
            direction,
            food: None,
            obstacles: Vec::new(),
            score: 0,
            level: Level::FIRST,
            apples_eaten: 0,
            apples_per_level: APPLES_PER_LEVEL,
            portal: PortalView {
                open: false,
                first_column: 19,
                last_column: 20,
            },
            transition_ticks_remaining: None,
            speed: Speed::INITIAL,
            terminated: false,
            tick_index: 1,
            grid: GridGeometry::STANDARD,
        }
    }

    fn horizontal(head: CellCoord) -> Vec<CellCoord> {
        vec![
            head,
            CellCoord::new(head.column() - 1, head.row()),
            CellCoord::new(head.column() - 2, head.row()),
        ]
    }

    #[test]
    fn straight_ahead_wins_ties() {
        let directions: Vec<Direction> = candidate_directions(Direction::Left).collect();
        assert_eq!(directions[0], Direction::Left);
        assert_eq!(directions.len(), 3);
        assert!(!directions.contains(&Direction::Right));
    }

    #[test]
    fn tail_tip_is_not_blocked() {
        let view = snapshot(horizontal(CellCoord::new(10, 10)), Direction::Right);
        let blocked = blocked_cells(&view);
        assert!(blocked.contains(&CellCoord::new(10, 10)));
        assert!(blocked.contains(&CellCoord::new(9, 10)));
        assert!(!blocked.contains(&CellCoord::new(8, 10)));
    }

    #[test]
    fn turns_toward_food_above() {
        let mut view = snapshot(horizontal(CellCoord::new(10, 10)), Direction::Right);
        view.food = Some(CellCoord::new(10, 2));
        let mut autopilot = Autopilot::new();
        assert_eq!(autopilot.choose(&view), Some(Direction::Up));
    }

    #[test]
    fn avoids_the_right_wall() {
        let view = snapshot(horizontal(CellCoord::new(39, 10)), Direction::Right);
        let mut autopilot = Autopilot::new();
        let choice = autopilot.choose(&view);
        assert!(matches!(choice, Some(Direction::Up | Direction::Down)));
    }

    #[test]
    fn keeps_climbing_above_the_field() {
        let mut view = snapshot(
            vec![
                CellCoord::new(20, -1),
                CellCoord::new(20, 0),
                CellCoord::new(20, 1),
            ],
            Direction::Up,
        );
        view.portal.open = true;
        let mut autopilot = Autopilot::new();
        assert_eq!(autopilot.choose(&view), Some(Direction::Up));
    }
}
