use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use maze_runner_core::{CellCoord, GeneratorConfig, SessionConfig};
use serde::Deserialize;

/// Options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub(crate) struct Options {
    /// TOML file with `[generator]` and `[session]` tables.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Seed for maze generation; drawn from entropy when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Number of maze rows.
    #[arg(long)]
    pub(crate) rows: Option<u32>,

    /// Number of maze columns.
    #[arg(long)]
    pub(crate) columns: Option<u32>,

    /// Probability that any cell other than start and goal is blocked.
    #[arg(long)]
    pub(crate) block_probability: Option<f64>,

    /// Rejected candidates tolerated before a corridor is carved.
    #[arg(long)]
    pub(crate) max_attempts: Option<u32>,

    /// Ticks available before the session times out.
    #[arg(long)]
    pub(crate) time_budget: Option<u32>,
}

/// Contents of the optional configuration file.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) generator: GeneratorConfig,
    pub(crate) session: SessionConfig,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml")
    }
}

/// Loads the config file, if any, and applies command-line overrides.
///
/// When the grid size is overridden and the file kept the default goal, the
/// goal follows the bottom-right corner.
pub(crate) fn resolve(options: &Options) -> Result<(GeneratorConfig, SessionConfig)> {
    let file = match &options.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    Ok(apply_overrides(file, options))
}

fn apply_overrides(file: FileConfig, options: &Options) -> (GeneratorConfig, SessionConfig) {
    let FileConfig {
        mut generator,
        mut session,
    } = file;

    let resized = options.rows.is_some() || options.columns.is_some();
    if let Some(rows) = options.rows {
        generator.rows = rows;
    }
    if let Some(columns) = options.columns {
        generator.columns = columns;
    }
    if resized {
        if generator.goal == GeneratorConfig::default().goal {
            generator.goal = CellCoord::new(
                generator.rows.saturating_sub(1),
                generator.columns.saturating_sub(1),
            );
        } else if generator.goal.row() >= generator.rows
            || generator.goal.column() >= generator.columns
        {
            log::warn!(
                "configured goal {:?} lies outside the resized {}x{} grid",
                generator.goal,
                generator.rows,
                generator.columns
            );
        }
    }
    if let Some(probability) = options.block_probability {
        generator.block_probability = probability;
    }
    if let Some(max_attempts) = options.max_attempts {
        generator.max_attempts = max_attempts;
    }
    if let Some(time_budget) = options.time_budget {
        session.time_budget = time_budget;
    }
    if options.seed.is_some() {
        session.seed = options.seed;
    }

    (generator, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let config = FileConfig::parse(
            r#"
            [generator]
            rows = 6
            block_probability = 0.2

            [session]
            seed = 42
        "#,
        )
        .expect("valid toml");

        assert_eq!(config.generator.rows, 6);
        assert_eq!(config.generator.columns, 10);
        assert!((config.generator.block_probability - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.session.seed, Some(42));
        assert_eq!(config.session.time_budget, 60);
    }

    #[test]
    fn endpoints_parse_as_inline_tables() {
        let config = FileConfig::parse(
            r#"
            [generator]
            start = { row = 1, column = 2 }
            goal = { row = 8, column = 3 }
        "#,
        )
        .expect("valid toml");

        assert_eq!(config.generator.start, CellCoord::new(1, 2));
        assert_eq!(config.generator.goal, CellCoord::new(8, 3));
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(FileConfig::parse("[renderer]\nscale = 2\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let options = Options {
            seed: Some(9),
            time_budget: Some(15),
            block_probability: Some(0.1),
            ..Options::default()
        };

        let (generator, session) = apply_overrides(FileConfig::default(), &options);

        assert_eq!(session.seed, Some(9));
        assert_eq!(session.time_budget, 15);
        assert!((generator.block_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(generator.goal, CellCoord::new(9, 9));
    }

    #[test]
    fn resizing_moves_goal_to_far_corner() {
        let options = Options {
            rows: Some(5),
            columns: Some(7),
            ..Options::default()
        };

        let (generator, _) = apply_overrides(FileConfig::default(), &options);

        assert_eq!(generator.goal, CellCoord::new(4, 6));
    }

    #[test]
    fn resizing_keeps_goal_set_in_file() {
        let file = FileConfig::parse(
            r#"
            [generator]
            goal = { row = 2, column = 3 }
        "#,
        )
        .expect("valid toml");
        let options = Options {
            rows: Some(5),
            columns: Some(7),
            ..Options::default()
        };

        let (generator, _) = apply_overrides(file, &options);

        assert_eq!((generator.rows, generator.columns), (5, 7));
        assert_eq!(generator.goal, CellCoord::new(2, 3));
    }
}
