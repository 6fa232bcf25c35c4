#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level generation system producing the obstacle layout for a level index.
//!
//! Levels one through five use fixed layouts. Every later level is generated
//! procedurally from clustered blocks and, from level eight onward, long
//! straight walls. All randomness comes from the caller-provided RNG so a
//! seeded session replays identical layouts.

use rand::Rng;
use snake_portal_core::{CellCoord, GridGeometry, Level, Obstacle, ObstacleLayout};

/// First level whose layout is generated procedurally.
pub const PROCEDURAL_LEVEL: u32 = 6;

/// First level that adds straight walls on top of the clusters.
pub const LINE_LEVEL: u32 = 8;

const MIN_CLUSTERS: u32 = 2;
const MAX_CLUSTERS: u32 = 15;
const MIN_CLUSTER_SIZE: i32 = 3;
const MAX_CLUSTER_SIZE: i32 = 7;
const CLUSTER_CENTER_MARGIN: i32 = 8;
const CLUSTER_INCLUSION_PROBABILITY: f64 = 0.7;

/// Cells closer than this to any edge never receive cluster blocks.
pub const CLUSTER_BORDER_MARGIN: i32 = 3;

/// Straight walls start and end at least this many cells from the edges.
pub const LINE_BORDER_MARGIN: i32 = 5;

/// Pure system that produces obstacle layouts for the session.
#[derive(Clone, Copy, Debug)]
pub struct LevelGenerator {
    grid: GridGeometry,
}

impl LevelGenerator {
    /// Creates a generator for the provided play field.
    #[must_use]
    pub const fn new(grid: GridGeometry) -> Self {
        Self { grid }
    }

    /// Play field the generator lays obstacles out on.
    #[must_use]
    pub const fn grid(&self) -> GridGeometry {
        self.grid
    }

    /// Produces the obstacle layout for `level`.
    ///
    /// Fixed layouts never consume randomness.
    pub fn generate<R>(&self, level: Level, rng: &mut R) -> ObstacleLayout
    where
        R: Rng + ?Sized,
    {
        match level.get() {
            0 | 1 => ObstacleLayout::empty(),
            2 => self.center_bar(),
            3 => self.side_walls(),
            4 => self.cross(),
            5 => self.maze(),
            index => self.procedural(index, rng),
        }
    }

    fn center_bar(&self) -> ObstacleLayout {
        let columns = self.grid.columns();
        let row = self.grid.rows() / 2;
        ObstacleLayout::new([Obstacle::new(horizontal(
            row,
            columns / 3,
            2 * columns / 3,
        ))])
    }

    fn side_walls(&self) -> ObstacleLayout {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        ObstacleLayout::new([
            Obstacle::new(vertical(5, 5, rows - 5)),
            Obstacle::new(vertical(columns - 6, 5, rows - 5)),
        ])
    }

    fn cross(&self) -> ObstacleLayout {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        let bar = horizontal(rows / 2, 8, columns - 8);
        let post = vertical(columns / 2, 8, rows - 8);
        ObstacleLayout::new([Obstacle::new(bar.chain(post))])
    }

    fn maze(&self) -> ObstacleLayout {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        let cells = horizontal(8, 5, 15)
            .chain(horizontal(8, 20, 30))
            .chain(horizontal(rows - 9, 10, 20))
            .chain(horizontal(rows - 9, 25, 35))
            .chain(vertical(8, 12, 18))
            .chain(vertical(columns - 9, 12, 18));
        ObstacleLayout::new([Obstacle::new(cells)])
    }

    fn procedural<R>(&self, index: u32, rng: &mut R) -> ObstacleLayout
    where
        R: Rng + ?Sized,
    {
        let mut cells = Vec::new();
        for _ in 0..cluster_count(index) {
            self.scatter_cluster(rng, &mut cells);
        }

        if index >= LINE_LEVEL {
            for _ in 0..index / 4 {
                self.draw_line(rng, &mut cells);
            }
        }

        ObstacleLayout::new([Obstacle::new(cells)])
    }

    fn scatter_cluster<R>(&self, rng: &mut R, out: &mut Vec<CellCoord>)
    where
        R: Rng + ?Sized,
    {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        let center_column = uniform(
            rng,
            CLUSTER_CENTER_MARGIN,
            columns - CLUSTER_CENTER_MARGIN,
        );
        let center_row = uniform(rng, CLUSTER_CENTER_MARGIN, rows - CLUSTER_CENTER_MARGIN);
        let size = uniform(rng, MIN_CLUSTER_SIZE, MAX_CLUSTER_SIZE);

        for i in 0..size {
            for j in 0..size {
                if !rng.gen_bool(CLUSTER_INCLUSION_PROBABILITY) {
                    continue;
                }
                let cell = CellCoord::new(center_column + i - size / 2, center_row + j - size / 2);
                if within_margin(self.grid, cell, CLUSTER_BORDER_MARGIN) {
                    out.push(cell);
                }
            }
        }
    }

    fn draw_line<R>(&self, rng: &mut R, out: &mut Vec<CellCoord>)
    where
        R: Rng + ?Sized,
    {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        if rng.gen_bool(0.5) {
            let row = uniform(rng, LINE_BORDER_MARGIN, rows - LINE_BORDER_MARGIN - 1);
            let start = uniform(rng, LINE_BORDER_MARGIN, columns / 3);
            let end = uniform(rng, 2 * columns / 3, columns - LINE_BORDER_MARGIN);
            out.extend(horizontal(row, start, end));
        } else {
            let column = uniform(rng, LINE_BORDER_MARGIN, columns - LINE_BORDER_MARGIN - 1);
            let start = uniform(rng, LINE_BORDER_MARGIN, rows / 3);
            let end = uniform(rng, 2 * rows / 3, rows - LINE_BORDER_MARGIN);
            out.extend(vertical(column, start, end));
        }
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new(GridGeometry::STANDARD)
    }
}

/// Number of clusters scattered on a procedural level.
#[must_use]
pub fn cluster_count(level_index: u32) -> u32 {
    level_index
        .saturating_sub(3)
        .clamp(MIN_CLUSTERS, MAX_CLUSTERS)
}

/// Reports whether `cell` lies strictly inside the border band of width `margin`.
#[must_use]
pub fn within_margin(grid: GridGeometry, cell: CellCoord, margin: i32) -> bool {
    cell.column() > margin
        && cell.column() < grid.columns() - margin
        && cell.row() > margin
        && cell.row() < grid.rows() - margin
}

fn horizontal(row: i32, start: i32, end: i32) -> impl Iterator<Item = CellCoord> {
    (start..end).map(move |column| CellCoord::new(column, row))
}

fn vertical(column: i32, start: i32, end: i32) -> impl Iterator<Item = CellCoord> {
    (start..end).map(move |row| CellCoord::new(column, row))
}

fn uniform<R>(rng: &mut R, low: i32, high: i32) -> i32
where
    R: Rng + ?Sized,
{
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}
