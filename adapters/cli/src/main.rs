#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Maze Runner sessions in a terminal.

mod config;
mod play;
mod render;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maze_runner_system_generation::MazeGenerator;
use maze_runner_system_pathfinding::find_path;
use maze_runner_world::GameSession;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Options;

/// Race through a random maze against the clock and the shortest route.
#[derive(Parser, Debug)]
#[command(name = "maze-runner", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play an interactive session, reading moves from stdin.
    Play {
        #[command(flatten)]
        options: Options,

        /// Milliseconds between clock ticks.
        #[arg(long, default_value_t = 1_000)]
        tick_millis: u64,
    },
    /// Print a generated maze together with its shortest route.
    Generate {
        #[command(flatten)]
        options: Options,
    },
}

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().mode {
        Mode::Play {
            options,
            tick_millis,
        } => {
            let (generator_config, session_config) = config::resolve(&options)?;
            let generator =
                MazeGenerator::new(generator_config).context("invalid generator configuration")?;
            let session = GameSession::new(generator, &session_config);
            play::run(session, Duration::from_millis(tick_millis))
        }
        Mode::Generate { options } => {
            let (generator_config, session_config) = config::resolve(&options)?;
            let generator =
                MazeGenerator::new(generator_config).context("invalid generator configuration")?;
            let mut rng = match session_config.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let generated = generator.generate(&mut rng);
            let grid = generated.grid();
            let path = find_path(grid, grid.start(), grid.goal());

            print!("{}", render::route(grid, &path));
            println!(
                "Optimal Steps: {} | Attempts: {}{}",
                path.len().saturating_sub(1),
                generated.attempts(),
                if generated.fell_back() {
                    " (corridor carved)"
                } else {
                    ""
                }
            );
            Ok(())
        }
    }
}
