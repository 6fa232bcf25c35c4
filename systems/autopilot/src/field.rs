//! Reverse breadth-first distance field over the play grid.

use std::collections::VecDeque;

use snake_portal_core::{CellCoord, Direction, GridGeometry};

/// Dense step-count grid seeded from a set of goal cells.
///
/// Distances default to `u16::MAX` for cells that cannot reach a goal.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    grid: GridGeometry,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Rebuilds the distances from `goals`, never stepping onto blocked cells.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        grid: GridGeometry,
        goals: &[CellCoord],
        is_blocked: F,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        self.grid = grid;
        self.distances.clear();
        self.distances.resize(grid.cell_count(), u16::MAX);

        let mut queue = VecDeque::new();
        for &goal in goals {
            if is_blocked(goal) {
                continue;
            }
            let Some(index) = self.index(goal) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            queue.push_back(goal);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let neighbor = cell.offset(direction);
                if is_blocked(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Steps from `cell` to the nearest goal, if one is reachable.
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u16> {
        let index = self.index(cell)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u16::MAX)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.grid.contains(cell) {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.grid.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
