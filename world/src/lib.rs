#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Runner.
//!
//! A [`GameSession`] owns the active maze, the player's progress and the
//! clock. It changes only in response to [`Command`] values handled one at a
//! time, and reports what happened through [`Event`] values. Presentation
//! layers read state through the [`query`] module.

use maze_runner_core::{
    CellCoord, Command, Direction, Event, Grid, Outcome, PlayState, SessionConfig,
    SessionSnapshot,
};
use maze_runner_system_generation::MazeGenerator;
use maze_runner_system_pathfinding::optimal_steps;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Reasons a session cannot be started on a provided grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The goal cannot be reached from the start.
    #[error("goal {goal:?} is unreachable from start {start:?}")]
    Unsolvable {
        /// Start cell of the rejected grid.
        start: CellCoord,
        /// Goal cell of the rejected grid.
        goal: CellCoord,
    },
}

/// Represents a single play session on a solvable maze.
#[derive(Debug)]
pub struct GameSession {
    generator: MazeGenerator,
    rng: ChaCha8Rng,
    time_budget: u32,
    state: SessionState,
}

/// Everything that is discarded on restart.
#[derive(Clone, Debug)]
struct SessionState {
    grid: Grid,
    player: CellCoord,
    score: u32,
    elapsed: u32,
    steps_taken: u32,
    play_state: PlayState,
    outcome: Option<Outcome>,
}

impl SessionState {
    fn fresh(grid: Grid) -> Self {
        Self {
            player: grid.start(),
            grid,
            score: 0,
            elapsed: 0,
            steps_taken: 0,
            play_state: PlayState::Playing,
            outcome: None,
        }
    }
}

impl GameSession {
    /// Creates a session on a freshly generated maze.
    ///
    /// The session draws randomness from the configured seed, or from entropy
    /// when no seed is set.
    #[must_use]
    pub fn new(generator: MazeGenerator, config: &SessionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let generated = generator.generate(&mut rng);
        Self {
            state: SessionState::fresh(generated.into_grid()),
            generator,
            rng,
            time_budget: config.time_budget,
        }
    }

    /// Creates a session on a caller-provided maze.
    ///
    /// Restarting the session replaces the grid with one from `generator`.
    pub fn with_grid(
        grid: Grid,
        generator: MazeGenerator,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        if optimal_steps(&grid).is_none() {
            return Err(SessionError::Unsolvable {
                start: grid.start(),
                goal: grid.goal(),
            });
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            state: SessionState::fresh(grid),
            generator,
            rng,
            time_budget: config.time_budget,
        })
    }

    /// Attempts to move the player one cell in `direction`.
    ///
    /// Moves out of bounds or into a blocked cell are ignored, as is every
    /// move after the session has ended.
    pub fn handle_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let state = &mut self.state;
        if state.play_state.is_terminal() {
            return;
        }

        let Some(target) = state.player.step(direction) else {
            return;
        };
        if state.grid.is_blocked(target) {
            return;
        }

        let from = state.player;
        state.player = target;
        state.steps_taken = state.steps_taken.saturating_add(1);
        state.score = state.score.saturating_add(1);
        out_events.push(Event::PlayerMoved { from, to: target });

        if target == state.grid.goal() {
            self.finish(true, out_events);
        }
    }

    /// Advances the session clock by one tick.
    pub fn handle_tick(&mut self, out_events: &mut Vec<Event>) {
        let state = &mut self.state;
        if state.play_state.is_terminal() {
            return;
        }

        state.elapsed = state.elapsed.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            elapsed: state.elapsed,
        });

        if state.elapsed >= self.time_budget {
            self.finish(false, out_events);
        }
    }

    /// Discards the current session and starts over on a new maze.
    pub fn restart(&mut self, out_events: &mut Vec<Event>) {
        let generated = self.generator.generate(&mut self.rng);
        out_events.push(Event::MazeGenerated {
            attempts: generated.attempts(),
            fell_back: generated.fell_back(),
        });
        self.state = SessionState::fresh(generated.into_grid());
    }

    /// Read-only snapshot of the session for presentation.
    #[must_use]
    pub fn current_state(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.play_state,
            player: self.state.player,
            score: self.state.score,
            elapsed: self.state.elapsed,
            time_budget: self.time_budget,
            steps_taken: self.state.steps_taken,
        }
    }

    /// Final classification, available once the session has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    /// Maze the session is played on.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    fn finish(&mut self, reached_goal: bool, out_events: &mut Vec<Event>) {
        let state = &mut self.state;
        let optimal = optimal_steps(&state.grid).unwrap_or_default();
        let outcome = Outcome::classify(reached_goal, state.steps_taken, optimal);
        state.play_state = outcome.play_state();
        state.outcome = Some(outcome);
        log::debug!(
            "session ended: {:?} after {} steps (optimal {}), {} ticks elapsed",
            outcome.kind(),
            outcome.steps_taken(),
            outcome.optimal_steps(),
            state.elapsed
        );
        out_events.push(Event::SessionEnded { outcome });
    }
}

/// Applies the provided command to the session.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => session.handle_move(direction, out_events),
        Command::Tick => session.handle_tick(out_events),
        Command::Restart => session.restart(out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::GameSession;
    use maze_runner_core::{CellCoord, Grid, Outcome, PlayState, SessionSnapshot};

    /// Captures a snapshot of the player's progress.
    #[must_use]
    pub fn snapshot(session: &GameSession) -> SessionSnapshot {
        session.current_state()
    }

    /// Final classification of the session, if it has ended.
    #[must_use]
    pub fn outcome(session: &GameSession) -> Option<Outcome> {
        session.outcome()
    }

    /// Provides read-only access to the active maze.
    #[must_use]
    pub fn grid(session: &GameSession) -> &Grid {
        session.grid()
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(session: &GameSession) -> CellCoord {
        session.state.player
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn play_state(session: &GameSession) -> PlayState {
        session.state.play_state
    }
}
