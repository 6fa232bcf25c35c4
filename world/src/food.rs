//! Food placement with a bounded reject-and-resample search.

use rand::{seq::IteratorRandom, Rng};
use snake_portal_core::{CellCoord, GridGeometry, PlacementError};

/// The single active food item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Food {
    cell: Option<CellCoord>,
}

impl Food {
    /// Cell the food occupies, absent after an exhausted placement.
    pub(crate) fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    pub(crate) fn is_at(&self, cell: CellCoord) -> bool {
        self.cell == Some(cell)
    }

    #[cfg(any(test, feature = "scenario_scaffolding"))]
    pub(crate) fn place(&mut self, cell: CellCoord) {
        self.cell = Some(cell);
    }

    /// Moves the food to a random cell rejected by neither the grid nor
    /// `is_forbidden`, clearing it when no such cell exists.
    pub(crate) fn try_respawn<R, F>(
        &mut self,
        rng: &mut R,
        grid: GridGeometry,
        max_attempts: u32,
        is_forbidden: F,
    ) -> Result<CellCoord, PlacementError>
    where
        R: Rng + ?Sized,
        F: Fn(CellCoord) -> bool,
    {
        match place(rng, grid, max_attempts, is_forbidden) {
            Ok(cell) => {
                self.cell = Some(cell);
                Ok(cell)
            }
            Err(error) => {
                self.cell = None;
                Err(error)
            }
        }
    }
}

/// Uniformly random cell inside the grid, unaware of anything occupying it.
pub(crate) fn generate_position<R>(rng: &mut R, grid: GridGeometry) -> CellCoord
where
    R: Rng + ?Sized,
{
    let column = rng.gen_range(0..grid.columns().max(1));
    let row = rng.gen_range(0..grid.rows().max(1));
    CellCoord::new(column, row)
}

/// Samples up to `max_attempts` random cells, then falls back to a uniform
/// pick among every remaining free cell.
fn place<R, F>(
    rng: &mut R,
    grid: GridGeometry,
    max_attempts: u32,
    is_forbidden: F,
) -> Result<CellCoord, PlacementError>
where
    R: Rng + ?Sized,
    F: Fn(CellCoord) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = generate_position(rng, grid);
        if !is_forbidden(candidate) {
            return Ok(candidate);
        }
    }

    grid.cells()
        .filter(|cell| !is_forbidden(*cell))
        .choose(rng)
        .ok_or(PlacementError::Exhausted {
            attempts: max_attempts,
        })
}
