//! Plain-text presentation of sessions and mazes.

use std::fmt::Write as _;

use maze_runner_core::{CellCoord, Grid, Outcome, OutcomeKind, SessionSnapshot};

const BLOCKED: char = '#';
const OPEN: char = '.';
const START: char = 'S';
const GOAL: char = 'G';
const PLAYER: char = '@';
const ROUTE: char = '*';

/// Draws the maze with the player marked on it.
pub(crate) fn board(grid: &Grid, player: CellCoord) -> String {
    draw(grid, |cell| (cell == player).then_some(PLAYER))
}

/// Draws the maze with the provided route overlaid.
pub(crate) fn route(grid: &Grid, path: &[CellCoord]) -> String {
    draw(grid, |cell| path.contains(&cell).then_some(ROUTE))
}

/// One-line summary of the player's progress.
pub(crate) fn status(snapshot: &SessionSnapshot) -> String {
    format!(
        "Score: {}   Time: {} s   Remaining: {} s",
        snapshot.score,
        snapshot.elapsed,
        snapshot.remaining_time()
    )
}

/// End-of-session message.
pub(crate) fn outcome(outcome: &Outcome) -> String {
    let headline = match outcome.kind() {
        OutcomeKind::OptimalClear => "Congratulations!",
        OutcomeKind::Clear => "Goal reached.",
        OutcomeKind::TimedOut => "Game over: time is up.",
    };
    format!(
        "{headline}\nYour Steps: {} | Optimal Steps: {}",
        outcome.steps_taken(),
        outcome.optimal_steps()
    )
}

fn draw(grid: &Grid, mut overlay: impl FnMut(CellCoord) -> Option<char>) -> String {
    let width = usize::try_from(grid.columns()).unwrap_or(0);
    let mut text = String::with_capacity((width + 1) * grid.rows() as usize);
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = CellCoord::new(row, column);
            let symbol = overlay(cell).unwrap_or_else(|| {
                if cell == grid.start() {
                    START
                } else if cell == grid.goal() {
                    GOAL
                } else if grid.is_blocked(cell) {
                    BLOCKED
                } else {
                    OPEN
                }
            });
            text.push(symbol);
        }
        let _ = writeln!(text);
    }
    text
}
