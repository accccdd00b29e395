//! Randomised maze carving and initial entity scatter.

use motion_maze_core::{CellCoord, MazeDimensions, ObstacleKind, PowerUpKind};
use rand::{seq::SliceRandom, Rng};

use crate::{
    entities::{Obstacle, PowerUp},
    grid::Grid,
    maze::Maze,
};

/// Upper bound on random draws before falling back to a full scan.
pub(crate) const PLACEMENT_ATTEMPTS: usize = 64;

const MAX_POWER_UPS: u32 = 5;
const MAX_OBSTACLES: u32 = 3;

/// Carves a spanning tree into a fully walled grid using iterative
/// depth-first search rooted at the origin.
pub(crate) fn carve_passages<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let origin = CellCoord::new(0, 0);
    if grid.cell(origin).is_none() {
        return;
    }

    grid.mark_visited(origin);
    let mut stack: Vec<CellCoord> = Vec::new();
    let mut current = origin;
    let mut candidates: Vec<CellCoord> = Vec::with_capacity(4);

    loop {
        candidates.clear();
        candidates.extend(
            grid.neighbors(current)
                .filter(|neighbor| !grid.is_visited(*neighbor)),
        );

        if let Some(next) = candidates.choose(rng).copied() {
            let _ = grid.remove_wall_between(current, next);
            grid.mark_visited(next);
            stack.push(current);
            current = next;
        } else if let Some(previous) = stack.pop() {
            current = previous;
        } else {
            break;
        }
    }

    grid.clear_visited();
}

/// Number of power-ups scattered into a freshly generated maze.
#[must_use]
pub(crate) fn power_up_quota(level: u32) -> u32 {
    level.saturating_add(2).min(MAX_POWER_UPS)
}

/// Number of obstacles scattered into a freshly generated maze.
#[must_use]
pub(crate) fn obstacle_quota(level: u32) -> u32 {
    level.min(MAX_OBSTACLES)
}

/// Scatters the level's quota of power-ups and obstacles.
///
/// Start and finish are never used; stacking on an already occupied cell is
/// allowed. Entities without an eligible cell are skipped.
pub(crate) fn scatter_entities<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    let dimensions = maze.dimensions();
    let start = maze.start();
    let finish = maze.finish();
    let eligible = |cell: CellCoord| cell != start && cell != finish;

    for _ in 0..power_up_quota(maze.level()) {
        let Some(cell) = sample_cell(dimensions, rng, eligible) else {
            continue;
        };
        let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
        maze.add_power_up(PowerUp::new(cell, kind));
    }

    for _ in 0..obstacle_quota(maze.level()) {
        let Some(cell) = sample_cell(dimensions, rng, eligible) else {
            continue;
        };
        let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
        maze.add_obstacle(Obstacle::new(cell, kind));
    }
}

/// Draws a uniformly random cell accepted by `eligible`.
///
/// Tries [`PLACEMENT_ATTEMPTS`] random draws, then picks uniformly among all
/// remaining eligible cells. Returns `None` when no cell qualifies.
pub(crate) fn sample_cell<R, F>(
    dimensions: MazeDimensions,
    rng: &mut R,
    eligible: F,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
    F: Fn(CellCoord) -> bool,
{
    if dimensions.columns() == 0 || dimensions.rows() == 0 {
        return None;
    }

    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(
            rng.gen_range(0..dimensions.columns()),
            rng.gen_range(0..dimensions.rows()),
        );
        if eligible(cell) {
            return Some(cell);
        }
    }

    let remaining: Vec<CellCoord> = dimensions.cells().filter(|cell| eligible(*cell)).collect();
    remaining.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use motion_maze_core::Direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn reachable_from_origin(grid: &Grid) -> usize {
        let origin = CellCoord::new(0, 0);
        let mut seen = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                if !grid.is_passage(cell, direction) {
                    continue;
                }
                if let Some(next) = cell.offset(direction, 1, grid.dimensions()) {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen.len()
    }

    #[test]
    fn carved_grids_form_spanning_trees() {
        for (seed, columns, rows) in [(1, 10, 10), (2, 7, 3), (3, 1, 6), (4, 13, 13), (5, 2, 2)] {
            let dimensions = MazeDimensions::new(columns, rows);
            let mut grid = Grid::new(dimensions);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            carve_passages(&mut grid, &mut rng);

            let cells = (columns * rows) as usize;
            assert_eq!(grid.open_passages(), cells - 1);
            assert_eq!(reachable_from_origin(&grid), cells);
        }
    }

    #[test]
    fn carving_keeps_wall_pairs_consistent() {
        let dimensions = MazeDimensions::new(8, 6);
        let mut grid = Grid::new(dimensions);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        carve_passages(&mut grid, &mut rng);

        for cell in dimensions.cells() {
            for direction in [Direction::Right, Direction::Down] {
                let Some(neighbor) = cell.offset(direction, 1, dimensions) else {
                    continue;
                };
                let here = grid.cell(cell).expect("cell").has_wall(direction);
                let there = grid
                    .cell(neighbor)
                    .expect("neighbor")
                    .has_wall(direction.opposite());
                assert_eq!(here, there, "wall mismatch between {cell:?} and {neighbor:?}");
            }
        }
        assert!(grid.cells().iter().all(|cell| !grid.is_visited(cell.coord())));
    }

    #[test]
    fn single_cell_grid_stays_closed() {
        let mut grid = Grid::new(MazeDimensions::new(1, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        carve_passages(&mut grid, &mut rng);
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn quotas_follow_level() {
        assert_eq!(power_up_quota(1), 3);
        assert_eq!(power_up_quota(3), 5);
        assert_eq!(power_up_quota(9), 5);
        assert_eq!(obstacle_quota(1), 1);
        assert_eq!(obstacle_quota(2), 2);
        assert_eq!(obstacle_quota(7), 3);
    }

    #[test]
    fn sampling_falls_back_to_scan() {
        let dimensions = MazeDimensions::new(20, 20);
        let only = CellCoord::new(13, 17);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..8 {
            assert_eq!(sample_cell(dimensions, &mut rng, |cell| cell == only), Some(only));
        }
    }

    #[test]
    fn sampling_gives_up_without_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        assert_eq!(
            sample_cell(MazeDimensions::new(1, 2), &mut rng, |_| false),
            None
        );
    }
}
