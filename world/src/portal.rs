//! Portal gate carved into the top edge of the play field.

use snake_portal_core::{
    CellCoord, GridGeometry, PortalView, APPLES_PER_LEVEL, LEVEL_TRANSITION_TICKS,
    PORTAL_WIDTH_CELLS,
};

/// Open/closed flag, opening span and the level transition dwell timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PortalGate {
    open: bool,
    first_column: i32,
    last_column: i32,
    transition_ticks: u32,
}

impl PortalGate {
    /// Creates a closed gate centred on the top edge of `grid`.
    pub(crate) fn new(grid: GridGeometry) -> Self {
        let first_column = grid.columns() / 2 - PORTAL_WIDTH_CELLS / 2;
        Self {
            open: false,
            first_column,
            last_column: first_column + PORTAL_WIDTH_CELLS - 1,
            transition_ticks: 0,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the gate once `apples_eaten` reaches the threshold.
    ///
    /// Returns `true` only on the call that actually opened it.
    pub(crate) fn open_if_ready(&mut self, apples_eaten: u32) -> bool {
        if self.open || apples_eaten < APPLES_PER_LEVEL {
            return false;
        }
        self.open = true;
        true
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    /// Column the snake re-enters the next level on.
    pub(crate) fn center_column(&self) -> i32 {
        self.first_column + PORTAL_WIDTH_CELLS / 2
    }

    /// Reports whether the open gate lets `head` sit above the field.
    ///
    /// Such heads are exempt from the wall rule.
    pub(crate) fn is_at_opening(&self, head: CellCoord) -> bool {
        self.open
            && head.row() <= -1
            && (self.first_column..=self.last_column).contains(&head.column())
    }

    /// Reports whether every segment has left the field through the open gate.
    pub(crate) fn is_fully_through<I>(&self, body: I) -> bool
    where
        I: IntoIterator<Item = CellCoord>,
    {
        self.open && body.into_iter().all(|segment| segment.row() < 0)
    }

    /// Starts the dwell timer; the only place it is rewound.
    pub(crate) fn begin_transition(&mut self) {
        self.transition_ticks = 0;
    }

    /// Counts one dwell tick, returning `true` when the dwell has elapsed.
    pub(crate) fn advance_transition(&mut self) -> bool {
        self.transition_ticks = self.transition_ticks.saturating_add(1);
        self.transition_ticks >= LEVEL_TRANSITION_TICKS
    }

    pub(crate) fn transition_ticks_remaining(&self) -> u32 {
        LEVEL_TRANSITION_TICKS.saturating_sub(self.transition_ticks)
    }

    pub(crate) fn view(&self) -> PortalView {
        PortalView {
            open: self.is_open(),
            first_column: self.first_column,
            last_column: self.last_column,
        }
    }
}
