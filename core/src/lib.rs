#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the value types and message surface that connect
//! adapters, the authoritative session, and the pure systems. Adapters submit
//! [`Command`] values describing player intent, the session executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! presentation layers may react to. The occupancy [`Grid`] is immutable once
//! built, so systems can query it freely without coordination.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of ticks a session lasts when no explicit budget is configured.
pub const DEFAULT_TIME_BUDGET: u32 = 60;

/// Number of rejected candidates tolerated before the generator carves a corridor.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4_096;

/// Largest number of cells a grid may hold.
pub const MAX_GRID_CELLS: u64 = 1 << 24;

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }

    /// Cell reached by a single step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are not checked here; see [`Grid::contains`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (row_delta, column_delta) = direction.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        Some(CellCoord::new(row, column))
    }
}

/// Cardinal movement directions available to the player.
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
    /// Every direction in the fixed order used for neighbour expansion.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit `(row, column)` offset applied by a step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Reasons a grid description may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows or no columns.
    #[error("grid dimensions must be non-zero, got {rows}x{columns}")]
    EmptyDimensions {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The grid would hold more than [`MAX_GRID_CELLS`] cells.
    #[error(
        "grid of {rows}x{columns} cells exceeds the limit of {limit} cells",
        limit = MAX_GRID_CELLS
    )]
    TooLarge {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The provided cell buffer does not match the requested dimensions.
    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
    /// A designated endpoint lies outside the grid.
    #[error("cell {cell:?} lies outside the grid")]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A designated endpoint is blocked.
    #[error("endpoint {cell:?} is blocked")]
    BlockedEndpoint {
        /// Offending cell.
        cell: CellCoord,
    },
}

/// Dense occupancy grid with designated start and goal cells.
///
/// Cells are stored in row-major order; `true` marks a blocked cell. The start
/// and goal are guaranteed to be in bounds and passable. A grid never changes
/// after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
    start: CellCoord,
    goal: CellCoord,
}

impl Grid {
    /// Creates a grid with every cell passable.
    pub fn open(
        rows: u32,
        columns: u32,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<Self, GridError> {
        let capacity = cell_capacity(rows, columns)?;
        Self::from_cells(rows, columns, start, goal, vec![false; capacity])
    }

    /// Creates a grid where exactly the provided cells are blocked.
    ///
    /// Cells outside the grid are ignored.
    pub fn with_blocked<I>(
        rows: u32,
        columns: u32,
        start: CellCoord,
        goal: CellCoord,
        blocked: I,
    ) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let capacity = cell_capacity(rows, columns)?;
        let mut cells = vec![false; capacity];
        for cell in blocked {
            if let Some(index) = index(rows, columns, cell) {
                cells[index] = true;
            }
        }
        Self::from_cells(rows, columns, start, goal, cells)
    }

    /// Creates a grid from a dense row-major occupancy buffer.
    pub fn from_cells(
        rows: u32,
        columns: u32,
        start: CellCoord,
        goal: CellCoord,
        cells: Vec<bool>,
    ) -> Result<Self, GridError> {
        let expected = cell_capacity(rows, columns)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let grid = Self {
            rows,
            columns,
            cells,
            start,
            goal,
        };

        for endpoint in [start, goal] {
            if !grid.contains(endpoint) {
                return Err(GridError::OutOfBounds { cell: endpoint });
            }
            if grid.is_blocked(endpoint) {
                return Err(GridError::BlockedEndpoint { cell: endpoint });
            }
        }

        Ok(grid)
    }

    /// Grid with the same dimensions and endpoints but a different occupancy.
    ///
    /// The buffer is truncated or padded with passable cells to fit, and the
    /// start and goal are forced passable regardless of its contents.
    #[must_use]
    pub fn with_occupancy(&self, mut cells: Vec<bool>) -> Self {
        cells.resize(self.cells.len(), false);
        for endpoint in [self.start, self.goal] {
            if let Some(slot) =
                index(self.rows, self.columns, endpoint).and_then(|offset| cells.get_mut(offset))
            {
                *slot = false;
            }
        }
        Self {
            rows: self.rows,
            columns: self.columns,
            cells,
            start: self.start,
            goal: self.goal,
        }
    }

    /// Releases the occupancy buffer.
    #[must_use]
    pub fn into_cells(self) -> Vec<bool> {
        self.cells
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Cell where every session begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Reports whether the cell is blocked. Cells outside the grid count as blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        index(self.rows, self.columns, cell)
            .and_then(|offset| self.cells.get(offset).copied())
            .unwrap_or(true)
    }

    /// Reports whether the cell lies within the grid and may be entered.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        !self.is_blocked(cell)
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|blocked| **blocked).count()
    }

    /// Dense occupancy flags stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// In-bounds orthogonal neighbours of `cell` in [`Direction::ALL`] order.
    ///
    /// Blocked neighbours are included; callers filter on passability.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |candidate| self.contains(*candidate))
    }
}

fn cell_capacity(rows: u32, columns: u32) -> Result<usize, GridError> {
    if rows == 0 || columns == 0 {
        return Err(GridError::EmptyDimensions { rows, columns });
    }
    let capacity = u64::from(rows) * u64::from(columns);
    if capacity > MAX_GRID_CELLS {
        return Err(GridError::TooLarge { rows, columns });
    }
    usize::try_from(capacity).map_err(|_| GridError::TooLarge { rows, columns })
}

fn index(rows: u32, columns: u32, cell: CellCoord) -> Option<usize> {
    if cell.row() >= rows || cell.column() >= columns {
        return None;
    }
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

/// Commands that express every permissible session mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance one cell in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Advances the session clock by one tick.
    Tick,
    /// Discards the current session and starts over on a fresh maze.
    Restart,
}

/// Events reported by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new maze was accepted and a session started on it.
    MazeGenerated {
        /// Number of candidates sampled before one was accepted.
        attempts: u32,
        /// Indicates whether the generator had to carve a fallback corridor.
        fell_back: bool,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Total ticks elapsed since the session started.
        elapsed: u32,
    },
    /// The session reached a terminal state.
    SessionEnded {
        /// Final classification of the session.
        outcome: Outcome,
    },
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// The session accepts moves and ticks.
    Playing,
    /// The player reached the goal.
    Won,
    /// The time budget ran out before the goal was reached.
    TimedOut,
}

impl PlayState {
    /// Reports whether the session has terminated.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Classification attached to a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Goal reached using exactly the optimal number of steps.
    OptimalClear,
    /// Goal reached, but with more steps than the optimal route needs.
    Clear,
    /// The time budget expired before the goal was reached.
    TimedOut,
}

/// Terminal result of a session scored against the shortest route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    kind: OutcomeKind,
    steps_taken: u32,
    optimal_steps: u32,
}

impl Outcome {
    /// Classifies a finished session.
    ///
    /// A timed-out session is always [`OutcomeKind::TimedOut`], whatever its
    /// step count.
    #[must_use]
    pub const fn classify(reached_goal: bool, steps_taken: u32, optimal_steps: u32) -> Self {
        let kind = if !reached_goal {
            OutcomeKind::TimedOut
        } else if steps_taken == optimal_steps {
            OutcomeKind::OptimalClear
        } else {
            OutcomeKind::Clear
        };
        Self {
            kind,
            steps_taken,
            optimal_steps,
        }
    }

    /// Classification of the session.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Steps the player actually took.
    #[must_use]
    pub const fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Length of the shortest route from start to goal, in transitions.
    #[must_use]
    pub const fn optimal_steps(&self) -> u32 {
        self.optimal_steps
    }

    /// Terminal session state implied by the classification.
    #[must_use]
    pub const fn play_state(&self) -> PlayState {
        match self.kind {
            OutcomeKind::OptimalClear | OutcomeKind::Clear => PlayState::Won,
            OutcomeKind::TimedOut => PlayState::TimedOut,
        }
    }
}

/// Read-only snapshot of a session used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Lifecycle state of the session.
    pub state: PlayState,
    /// Cell currently occupied by the player.
    pub player: CellCoord,
    /// Score accumulated so far. Equal to the accepted step count.
    pub score: u32,
    /// Ticks elapsed since the session started.
    pub elapsed: u32,
    /// Ticks available before the session times out.
    pub time_budget: u32,
    /// Accepted moves since the session started.
    pub steps_taken: u32,
}

impl SessionSnapshot {
    /// Ticks left before the session times out.
    #[must_use]
    pub const fn remaining_time(&self) -> u32 {
        self.time_budget.saturating_sub(self.elapsed)
    }
}

/// Parameters that control maze generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of rows in generated grids.
    pub rows: u32,
    /// Number of columns in generated grids.
    pub columns: u32,
    /// Cell where the player begins; always left passable.
    pub start: CellCoord,
    /// Cell the player must reach; always left passable.
    pub goal: CellCoord,
    /// Independent probability that any other cell is blocked, in `[0, 1)`.
    pub block_probability: f64,
    /// Candidates sampled before falling back to a carved corridor.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 10,
            start: CellCoord::new(0, 0),
            goal: CellCoord::new(9, 9),
            block_probability: 0.4,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Parameters that control a play session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ticks available before the session times out.
    pub time_budget: u32,
    /// Seed for maze generation; sessions draw from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            seed: None,
        }
    }
}
