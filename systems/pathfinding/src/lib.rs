#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless A* search over the maze occupancy grid.
//!
//! The search serves two callers: the generator uses it as a solvability
//! oracle and the session uses it to score a finished run against the
//! shortest route. Movement is four-directional with unit cost, and the
//! Manhattan heuristic is both admissible and consistent for that model, so
//! the first time the goal leaves the frontier its path is optimal.
//!
//! Results are fully deterministic. Neighbours are generated in the order
//! up, down, left, right and frontier entries with equal `f` cost are
//! expanded in the order they were pushed.

use std::{cmp::Reverse, collections::BinaryHeap};

use maze_runner_core::{CellCoord, Grid};

/// Computes the shortest passable route between `start` and `goal`.
///
/// The returned path includes both endpoints. It is empty when no route
/// exists or when either endpoint lies outside the grid, and it is exactly
/// `[start]` when `start == goal`. Blocked endpoints are not rejected; callers
/// guarantee both are passable.
#[must_use]
pub fn find_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    if !grid.contains(start) || !grid.contains(goal) {
        return Vec::new();
    }

    let mut search = Search::new(grid, goal);
    search.push(start, None, 0);

    while let Some((_, Reverse(entry))) = search.frontier.pop() {
        let node = search.nodes[entry];

        if node.cell == goal {
            log::trace!(
                "path found after {} frontier entries ({} cells finalised)",
                search.nodes.len(),
                search.finalised_count
            );
            return search.trace(entry);
        }

        if !search.finalise(node.cell) {
            continue;
        }

        let next_cost = node.cost + 1;
        for neighbor in grid.neighbors(node.cell) {
            if grid.is_blocked(neighbor) || search.is_finalised(neighbor) {
                continue;
            }
            search.push(neighbor, Some(entry), next_cost);
        }
    }

    log::trace!(
        "no path from {start:?} to {goal:?} after {} cells",
        search.finalised_count
    );
    Vec::new()
}

/// Number of transitions on the shortest route from the grid's start to its goal.
///
/// Returns `None` when the goal is unreachable.
#[must_use]
pub fn optimal_steps(grid: &Grid) -> Option<u32> {
    let path = find_path(grid, grid.start(), grid.goal());
    let transitions = path.len().checked_sub(1)?;
    Some(u32::try_from(transitions).unwrap_or(u32::MAX))
}

#[derive(Clone, Copy, Debug)]
struct Node {
    cell: CellCoord,
    parent: Option<usize>,
    cost: u32,
}

/// Working state for a single search.
///
/// Every frontier entry is recorded in `nodes`; an entry's index doubles as
/// its insertion sequence number, which breaks ties between equal `f` costs.
struct Search<'a> {
    grid: &'a Grid,
    goal: CellCoord,
    nodes: Vec<Node>,
    frontier: BinaryHeap<(Reverse<u32>, Reverse<usize>)>,
    finalised: Vec<bool>,
    finalised_count: usize,
}

impl<'a> Search<'a> {
    fn new(grid: &'a Grid, goal: CellCoord) -> Self {
        Self {
            grid,
            goal,
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            finalised: vec![false; grid.cells().len()],
            finalised_count: 0,
        }
    }

    fn push(&mut self, cell: CellCoord, parent: Option<usize>, cost: u32) {
        let estimate = cost.saturating_add(cell.manhattan_distance(self.goal));
        let entry = self.nodes.len();
        self.nodes.push(Node { cell, parent, cost });
        self.frontier.push((Reverse(estimate), Reverse(entry)));
    }

    /// Marks the cell as finalised, returning `false` if it already was.
    fn finalise(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = self.slot(cell).and_then(|index| self.finalised.get_mut(index)) else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
        self.finalised_count += 1;
        true
    }

    fn is_finalised(&self, cell: CellCoord) -> bool {
        self.slot(cell)
            .and_then(|index| self.finalised.get(index).copied())
            .unwrap_or(true)
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        if !self.grid.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.grid.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn trace(&self, entry: usize) -> Vec<CellCoord> {
        let mut path = Vec::with_capacity(self.nodes[entry].cost as usize + 1);
        let mut cursor = Some(entry);
        while let Some(index) = cursor {
            let node = self.nodes[index];
            path.push(node.cell);
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let mut start = CellCoord::new(0, 0);
        let mut goal = CellCoord::new(0, 0);
        let mut blocked = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                let cell = CellCoord::new(row as u32, column as u32);
                match symbol {
                    '#' => blocked.push(cell),
                    'S' => start = cell,
                    'G' => goal = cell,
                    _ => {}
                }
            }
        }
        Grid::with_blocked(
            rows.len() as u32,
            rows[0].len() as u32,
            start,
            goal,
            blocked,
        )
        .expect("valid test grid")
    }

    #[test]
    fn single_cell_grid_yields_single_cell_path() {
        let cell = CellCoord::new(0, 0);
        let grid = Grid::open(1, 1, cell, cell).unwrap();

        assert_eq!(find_path(&grid, cell, cell), vec![cell]);
        assert_eq!(optimal_steps(&grid), Some(0));
    }

    #[test]
    fn open_grid_route_is_manhattan_length() {
        let grid = Grid::open(3, 3, CellCoord::new(0, 0), CellCoord::new(2, 2)).unwrap();

        let path = find_path(&grid, grid.start(), grid.goal());

        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.goal()));
        assert_eq!(optimal_steps(&grid), Some(4));
    }

    #[test]
    fn equal_cost_ties_prefer_earliest_generated_entry() {
        let grid = Grid::open(2, 2, CellCoord::new(0, 0), CellCoord::new(1, 1)).unwrap();

        let path = find_path(&grid, grid.start(), grid.goal());

        assert_eq!(
            path,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn follows_the_only_corridor() {
        let grid = grid_from(&[
            "S...#", //
            "###.#", //
            "#...#", //
            "#.###", //
            "#..G#",
        ]);

        let path = find_path(&grid, grid.start(), grid.goal());

        let expected: Vec<_> = [
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 3),
            (2, 3),
            (2, 2),
            (2, 1),
            (3, 1),
            (4, 1),
            (4, 2),
            (4, 3),
        ]
        .into_iter()
        .map(|(row, column)| CellCoord::new(row, column))
        .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn walled_off_goal_yields_empty_path() {
        let grid = grid_from(&[
            "S.#.", //
            "..#.", //
            "###.", //
            "...G",
        ]);

        assert!(find_path(&grid, grid.start(), grid.goal()).is_empty());
        assert_eq!(optimal_steps(&grid), None);
    }

    #[test]
    fn detours_around_walls_optimally() {
        let grid = grid_from(&[
            "S#...", //
            ".#.#.", //
            ".#.#.", //
            "...#G",
        ]);

        let path = find_path(&grid, grid.start(), grid.goal());

        assert_eq!(path.len(), 14);
        for window in path.windows(2) {
            assert_eq!(window[0].manhattan_distance(window[1]), 1);
            assert!(grid.is_passable(window[1]));
        }
    }

    #[test]
    fn out_of_bounds_endpoints_yield_empty_path() {
        let grid = Grid::open(2, 2, CellCoord::new(0, 0), CellCoord::new(1, 1)).unwrap();

        assert!(find_path(&grid, grid.start(), CellCoord::new(5, 5)).is_empty());
        assert!(find_path(&grid, CellCoord::new(2, 0), grid.goal()).is_empty());
    }

    #[test]
    fn repeated_searches_return_identical_paths() {
        let grid = grid_from(&[
            "S.....", //
            "..##..", //
            "......", //
            ".#..#.", //
            ".....G",
        ]);

        let first = find_path(&grid, grid.start(), grid.goal());
        let second = find_path(&grid, grid.start(), grid.goal());

        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }
}
