#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rejection-sampling maze generator with a guaranteed-solvable postcondition.
//!
//! Every candidate blocks each cell independently with the configured
//! probability, forces the start and goal open, and is accepted only when the
//! A* search finds a route between them. Sampling is bounded by
//! [`GeneratorConfig::max_attempts`]; once the bound is exhausted the last
//! candidate gets an L-shaped corridor carved from start to goal so generation
//! always terminates.

use maze_runner_core::{CellCoord, Grid, GridError};
use maze_runner_system_pathfinding::find_path;
use rand::{
    distributions::{Bernoulli, Distribution},
    Rng,
};
use thiserror::Error;

pub use maze_runner_core::GeneratorConfig;

/// Reasons a generator configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The grid dimensions or endpoints are invalid.
    #[error("invalid maze layout: {0}")]
    Layout(#[from] GridError),
    /// The blocking probability lies outside `[0, 1)`.
    #[error("block probability must lie in [0, 1), got {0}")]
    InvalidProbability(f64),
    /// The retry bound does not allow a single candidate.
    #[error("max_attempts must be at least 1")]
    NoAttempts,
}

/// Maze accepted by the generator along with sampling statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    grid: Grid,
    attempts: u32,
    fell_back: bool,
}

impl Generated {
    /// Accepted grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of candidates sampled, including the accepted one.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Reports whether the grid needed a carved corridor to become solvable.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.fell_back
    }

    /// Consumes the result, yielding the grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Validated generator that produces solvable grids on demand.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    config: GeneratorConfig,
    blocking: Bernoulli,
    template: Grid,
}

impl MazeGenerator {
    /// Validates the configuration and prepares a generator.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let probability = config.block_probability;
        if !(0.0..1.0).contains(&probability) {
            return Err(GenerationError::InvalidProbability(probability));
        }
        if config.max_attempts == 0 {
            return Err(GenerationError::NoAttempts);
        }
        let template = Grid::open(config.rows, config.columns, config.start, config.goal)?;
        let blocking = Bernoulli::new(probability)
            .map_err(|_| GenerationError::InvalidProbability(probability))?;

        Ok(Self {
            config,
            blocking,
            template,
        })
    }

    /// Samples candidates until one is solvable or the retry bound is exhausted.
    pub fn generate<R>(&self, rng: &mut R) -> Generated
    where
        R: Rng + ?Sized,
    {
        let GeneratorConfig {
            rows,
            columns,
            start,
            goal,
            max_attempts,
            ..
        } = self.config;

        let mut rejected = Vec::new();
        for attempt in 1..=max_attempts {
            let candidate = self.template.with_occupancy(self.sample(rng));
            if !find_path(&candidate, start, goal).is_empty() {
                log::debug!(
                    "accepted {rows}x{columns} maze after {attempt} attempt(s), {} blocked",
                    candidate.blocked_count()
                );
                return Generated {
                    grid: candidate,
                    attempts: attempt,
                    fell_back: false,
                };
            }
            rejected = candidate.into_cells();
        }

        log::warn!(
            "no solvable {rows}x{columns} maze within {max_attempts} attempts at p={}, carving corridor",
            self.config.block_probability
        );

        carve_corridor(&mut rejected, columns, start, goal);
        let grid = self.template.with_occupancy(rejected);
        debug_assert!(!find_path(&grid, start, goal).is_empty());

        Generated {
            grid,
            attempts: max_attempts,
            fell_back: true,
        }
    }

    fn sample<R>(&self, rng: &mut R) -> Vec<bool>
    where
        R: Rng + ?Sized,
    {
        (0..self.template.cells().len())
            .map(|_| self.blocking.sample(rng))
            .collect()
    }
}

/// Builds a generator from `config` and produces a single solvable grid.
pub fn generate<R>(config: &GeneratorConfig, rng: &mut R) -> Result<Generated, GenerationError>
where
    R: Rng + ?Sized,
{
    Ok(MazeGenerator::new(config.clone())?.generate(rng))
}

/// Opens the cells along the start row to the goal column, then along the goal column.
fn carve_corridor(cells: &mut [bool], columns: u32, start: CellCoord, goal: CellCoord) {
    let (low_column, high_column) = ordered(start.column(), goal.column());
    for column in low_column..=high_column {
        open(cells, columns, CellCoord::new(start.row(), column));
    }

    let (low_row, high_row) = ordered(start.row(), goal.row());
    for row in low_row..=high_row {
        open(cells, columns, CellCoord::new(row, goal.column()));
    }
}

fn open(cells: &mut [bool], columns: u32, cell: CellCoord) {
    if let Some(slot) = index(columns, cell).and_then(|offset| cells.get_mut(offset)) {
        *slot = false;
    }
}

fn ordered(first: u32, second: u32) -> (u32, u32) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

fn index(columns: u32, cell: CellCoord) -> Option<usize> {
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
