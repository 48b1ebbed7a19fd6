use maze_runner_core::{CellCoord, GeneratorConfig};
use maze_runner_system_generation::MazeGenerator;
use maze_runner_system_pathfinding::find_path;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arbitrary_config() -> impl Strategy<Value = GeneratorConfig> {
    (1u32..12, 1u32..12, 0.0f64..0.7)
        .prop_flat_map(|(rows, columns, block_probability)| {
            (
                Just(rows),
                Just(columns),
                Just(block_probability),
                0..rows,
                0..columns,
                0..rows,
                0..columns,
            )
        })
        .prop_map(
            |(rows, columns, block_probability, start_row, start_column, goal_row, goal_column)| {
                GeneratorConfig {
                    rows,
                    columns,
                    start: CellCoord::new(start_row, start_column),
                    goal: CellCoord::new(goal_row, goal_column),
                    block_probability,
                    max_attempts: 64,
                }
            },
        )
}

proptest! {
    #[test]
    fn generated_mazes_are_always_solvable(config in arbitrary_config(), seed in any::<u64>()) {
        let generator = MazeGenerator::new(config.clone()).expect("valid config");
        let generated = generator.generate(&mut ChaCha8Rng::seed_from_u64(seed));
        let grid = generated.grid();

        prop_assert_eq!(grid.rows(), config.rows);
        prop_assert_eq!(grid.columns(), config.columns);
        prop_assert_eq!(grid.start(), config.start);
        prop_assert_eq!(grid.goal(), config.goal);
        prop_assert!(grid.is_passable(config.start));
        prop_assert!(grid.is_passable(config.goal));
        prop_assert!(!find_path(grid, config.start, config.goal).is_empty());
        prop_assert!(generated.attempts() >= 1);
        prop_assert!(generated.attempts() <= config.max_attempts);
    }

    #[test]
    fn generation_is_reproducible_for_a_seed(config in arbitrary_config(), seed in any::<u64>()) {
        let generator = MazeGenerator::new(config).expect("valid config");
        let first = generator.generate(&mut ChaCha8Rng::seed_from_u64(seed));
        let second = generator.generate(&mut ChaCha8Rng::seed_from_u64(seed));

        prop_assert_eq!(first, second);
    }
}

#[test]
fn default_configuration_matches_classic_layout() {
    let config = GeneratorConfig::default();
    let generator = MazeGenerator::new(config).expect("default config is valid");
    let generated = generator.generate(&mut ChaCha8Rng::seed_from_u64(2024));
    let grid = generated.grid();

    assert_eq!((grid.rows(), grid.columns()), (10, 10));
    assert_eq!(grid.start(), CellCoord::new(0, 0));
    assert_eq!(grid.goal(), CellCoord::new(9, 9));
    assert!(find_path(grid, grid.start(), grid.goal()).len() >= 19);
}
