#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Portal engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`] values
//! describing player input or the passage of a tick, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Renderers never touch mutable state; they read a
//! [`SessionSnapshot`] once per frame.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of food items that must be eaten before the portal opens.
pub const APPLES_PER_LEVEL: u32 = 10;

/// Points awarded for every food item eaten.
pub const SCORE_PER_APPLE: u32 = 10;

/// Width of the portal opening carved into the top edge, in cells.
pub const PORTAL_WIDTH_CELLS: i32 = 2;

/// Number of ticks the level transition dwells before play resumes.
pub const LEVEL_TRANSITION_TICKS: u32 = 180;

/// Number of body segments a freshly reset snake carries.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Random draws attempted before food placement falls back to a full scan.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 4096;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed: the head leaves the play field through the portal,
/// so rows above the grid are valid intermediate positions. Bounds are checked
/// against a [`GridGeometry`] by the caller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            column: self.column.saturating_add(dx),
            row: self.row.saturating_add(dy),
        }
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement `(columns, rows)` applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the exact opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Describes the discrete play field.
///
/// The field is fixed at 40×30 cells of 20 pixels; [`GridGeometry::STANDARD`]
/// is the only geometry the engine ships with, but every component takes the
/// geometry as a value so tests can reason about it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridGeometry {
    columns: i32,
    rows: i32,
    cell_size: u32,
}

impl GridGeometry {
    /// The 800×600 pixel play field divided into 20 pixel cells.
    pub const STANDARD: GridGeometry = GridGeometry::new(40, 30, 20);

    /// Creates a new grid description.
    #[must_use]
    pub const fn new(columns: i32, rows: i32, cell_size: u32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Side length of a single square cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Total number of cells inside the play field.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let columns = usize::try_from(self.columns).unwrap_or(0);
        let rows = usize::try_from(self.rows).unwrap_or(0);
        columns.saturating_mul(rows)
    }

    /// Cell at the centre of the field, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Reports whether the cell lies within `[0, columns) × [0, rows)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.column() < self.columns
            && cell.row() >= 0
            && cell.row() < self.rows
    }

    /// Iterator over every in-bounds cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Pixel coordinates of the cell's upper-left corner.
    #[must_use]
    pub fn cell_origin_px(&self, cell: CellCoord) -> (i64, i64) {
        let size = i64::from(self.cell_size);
        (i64::from(cell.column()) * size, i64::from(cell.row()) * size)
    }

    /// Cell containing the provided pixel position.
    ///
    /// Returns `None` when the grid has a zero cell size.
    #[must_use]
    pub fn cell_at_px(&self, x: i64, y: i64) -> Option<CellCoord> {
        if self.cell_size == 0 {
            return None;
        }
        let size = i64::from(self.cell_size);
        let column = i32::try_from(x.div_euclid(size)).ok()?;
        let row = i32::try_from(y.div_euclid(size)).ok()?;
        Some(CellCoord::new(column, row))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One-based level index.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Level(u32);

impl Level {
    /// The level every new game starts on.
    pub const FIRST: Level = Level(1);

    /// Creates a level from its one-based index, clamping zero to the first level.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self::FIRST
        } else {
            Self(value)
        }
    }

    /// Retrieves the one-based level index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Tick cadence expressed in ticks per second, bounded to `[INITIAL, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Speed(f32);

impl Speed {
    /// Cadence of a freshly reset session.
    pub const INITIAL: Speed = Speed(10.0);
    /// Upper bound the cadence never exceeds.
    pub const MAX: Speed = Speed(20.0);
    /// Amount added for every food item eaten.
    pub const INCREMENT: f32 = 0.5;

    /// Ticks per second.
    #[must_use]
    pub const fn ticks_per_second(&self) -> f32 {
        self.0
    }

    /// Speed after eating one food item, saturating at [`Speed::MAX`].
    #[must_use]
    pub fn accelerate(self) -> Self {
        Self((self.0 + Self::INCREMENT).min(Self::MAX.0))
    }

    /// Wall-clock time between two consecutive ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.0.max(Self::INITIAL.0))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Static, immovable set of occupied cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    cells: BTreeSet<CellCoord>,
}

impl Obstacle {
    /// Creates an obstacle from the provided cells, discarding duplicates.
    #[must_use]
    pub fn new(cells: impl IntoIterator<Item = CellCoord>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Reports whether the cell belongs to the obstacle.
    #[must_use]
    pub fn check_collision(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterator over the obstacle's cells in sorted order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Number of cells occupied by the obstacle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the obstacle occupies no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Every obstacle belonging to a single level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    obstacles: Vec<Obstacle>,
}

impl ObstacleLayout {
    /// Layout without any obstacles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    /// Creates a layout from the provided obstacles, skipping empty ones.
    #[must_use]
    pub fn new(obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        Self {
            obstacles: obstacles
                .into_iter()
                .filter(|obstacle| !obstacle.is_empty())
                .collect(),
        }
    }

    /// Reports whether the cell belongs to any obstacle in the layout.
    #[must_use]
    pub fn check_collision(&self, cell: CellCoord) -> bool {
        self.obstacles
            .iter()
            .any(|obstacle| obstacle.check_collision(cell))
    }

    /// Obstacles composing the layout.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Distinct cells occupied by any obstacle, in sorted order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellCoord> {
        let unique: BTreeSet<CellCoord> = self
            .obstacles
            .iter()
            .flat_map(|obstacle| obstacle.cells())
            .collect();
        unique.into_iter().collect()
    }

    /// Number of distinct cells occupied by the layout.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells().len()
    }

    /// Reports whether the layout occupies no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Describes which rules of the simulation currently apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen; waits for a start request.
    Menu,
    /// The simulation advances every tick.
    Playing,
    /// The simulation is frozen until resumed.
    Paused,
    /// The snake left through the portal; only the dwell timer runs.
    LevelTransition,
    /// The snake crashed; waits for restart or a return to the menu.
    GameOver,
}

/// Stimulus that may move the state machine between [`GameState`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Player asked to begin playing from the menu.
    Start,
    /// Player pressed pause or resume.
    TogglePause,
    /// The whole snake body passed through the open portal.
    PortalTraversed,
    /// The level transition dwell timer elapsed.
    DwellElapsed,
    /// The head hit a wall, the body or an obstacle.
    Collision,
    /// Player asked for a fresh game straight away.
    Restart,
    /// Player asked for a fresh game via the menu.
    ReturnToMenu,
}

impl GameState {
    /// Resolves the state reached from `self` when `trigger` fires.
    ///
    /// Returns `None` for every pair that is not a legal transition.
    #[must_use]
    pub const fn transition(self, trigger: Trigger) -> Option<GameState> {
        match (self, trigger) {
            (Self::Menu, Trigger::Start) => Some(Self::Playing),
            (Self::Playing, Trigger::TogglePause) => Some(Self::Paused),
            (Self::Paused, Trigger::TogglePause) => Some(Self::Playing),
            (Self::Playing, Trigger::PortalTraversed) => Some(Self::LevelTransition),
            (Self::LevelTransition, Trigger::DwellElapsed) => Some(Self::Playing),
            (Self::Playing, Trigger::Collision) => Some(Self::GameOver),
            (Self::GameOver, Trigger::Restart) => Some(Self::Playing),
            (Self::GameOver, Trigger::ReturnToMenu) => Some(Self::Menu),
            _ => None,
        }
    }

    /// Reports whether the session is reset when `trigger` is accepted in this state.
    #[must_use]
    pub const fn resets_session(self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (Self::GameOver, Trigger::Restart) | (Self::GameOver, Trigger::ReturnToMenu)
        )
    }
}

/// Discrete logical input delivered by the input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Steer the snake upward.
    MoveUp,
    /// Steer the snake downward.
    MoveDown,
    /// Steer the snake to the left.
    MoveLeft,
    /// Steer the snake to the right.
    MoveRight,
    /// Pause while playing, resume while paused.
    TogglePause,
    /// Leave the menu and start playing.
    Start,
    /// Start a fresh game from the game-over screen.
    Restart,
    /// Return to the menu from the game-over screen.
    ReturnToMenu,
    /// Terminate the session from any state.
    Quit,
}

impl PlayerInput {
    /// Steering direction carried by the input, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveUp => Some(Direction::Up),
            Self::MoveDown => Some(Direction::Down),
            Self::MoveLeft => Some(Direction::Left),
            Self::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// State machine trigger carried by the input, if any.
    #[must_use]
    pub const fn trigger(self) -> Option<Trigger> {
        match self {
            Self::TogglePause => Some(Trigger::TogglePause),
            Self::Start => Some(Trigger::Start),
            Self::Restart => Some(Trigger::Restart),
            Self::ReturnToMenu => Some(Trigger::ReturnToMenu),
            _ => None,
        }
    }

    /// Input that steers the snake in the provided direction.
    #[must_use]
    pub const fn steer(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::MoveUp,
            Direction::Down => Self::MoveDown,
            Direction::Left => Self::MoveLeft,
            Direction::Right => Self::MoveRight,
        }
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Applies a player input according to the current state.
    Input {
        /// Input delivered by the adapter.
        input: PlayerInput,
    },
    /// Advances the simulation by exactly one step.
    Tick,
}

/// Terminal collisions that end a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    /// The head left the field outside the open portal.
    Wall,
    /// The head ran into another body segment.
    SelfBody,
    /// The head ran into a level obstacle.
    Obstacle,
}

/// Reasons food placement may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Every cell of the field is occupied.
    #[error("no free cell remained after {attempts} placement attempts")]
    Exhausted {
        /// Random draws performed before the full scan found nothing.
        attempts: u32,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The state machine moved between two states.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// The snake moved one cell.
    SnakeAdvanced {
        /// Cell the head occupies after the move.
        head: CellCoord,
    },
    /// The head reached the food cell.
    FoodEaten {
        /// Cell the food occupied.
        cell: CellCoord,
        /// Score after the food was counted.
        score: u32,
        /// Food items eaten on the current level.
        apples_eaten: u32,
    },
    /// Food could not be re-placed anywhere on the field.
    FoodPlacementFailed {
        /// Reason reported by the placement search.
        reason: PlacementError,
    },
    /// The portal in the top edge opened.
    PortalOpened,
    /// The session entered a new level with a fresh obstacle layout.
    LevelAdvanced {
        /// Level that became active.
        level: Level,
    },
    /// The head collided with something fatal.
    Collided {
        /// What the head ran into.
        kind: CollisionKind,
    },
    /// The session stopped accepting commands.
    Terminated,
}

/// Geometry and state of the portal as seen by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalView {
    /// Whether the portal currently lets the snake through.
    pub open: bool,
    /// Leftmost column of the opening.
    pub first_column: i32,
    /// Rightmost column of the opening.
    pub last_column: i32,
}

/// Read-only view of a session sufficient to draw a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Active state machine state.
    pub state: GameState,
    /// Snake body, head first.
    pub body: Vec<CellCoord>,
    /// Direction the snake travels on the next move.
    pub direction: Direction,
    /// Active food cell, absent only when placement was exhausted.
    pub food: Option<CellCoord>,
    /// Distinct obstacle cells of the current level.
    pub obstacles: Vec<CellCoord>,
    /// Accumulated score.
    pub score: u32,
    /// Active level.
    pub level: Level,
    /// Food items eaten on the current level.
    pub apples_eaten: u32,
    /// Food items required to open the portal.
    pub apples_per_level: u32,
    /// Portal geometry and state.
    pub portal: PortalView,
    /// Dwell ticks left while in [`GameState::LevelTransition`].
    pub transition_ticks_remaining: Option<u32>,
    /// Current tick cadence.
    pub speed: Speed,
    /// Whether the session has been terminated by a quit request.
    pub terminated: bool,
    /// Number of ticks processed since the session was created.
    pub tick_index: u64,
    /// Play field geometry.
    pub grid: GridGeometry,
}

impl SessionSnapshot {
    /// Head cell of the snake.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.body.first().copied()
    }
}
