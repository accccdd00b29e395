//! Cell graph underlying every maze.
//!
//! Walls are only ever opened through [`Grid::remove_wall_between`], which
//! clears the two facing flags together. No other code path touches them, so
//! the flags of adjacent cells always agree.

use motion_maze_core::{CellCoord, CellWalls, Direction, MazeDimensions};

/// Single maze cell with its wall flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    walls: CellWalls,
    visited: bool,
}

impl Cell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            walls: CellWalls::CLOSED,
            visited: false,
        }
    }

    /// Coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Current wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> CellWalls {
        self.walls
    }

    /// Reports whether the wall facing `direction` is present.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls.has(direction)
    }

    fn open(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.walls.top = false,
            Direction::Right => self.walls.right = false,
            Direction::Down => self.walls.bottom = false,
            Direction::Left => self.walls.left = false,
        }
    }
}

/// Dense row-major grid of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: MazeDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell is enclosed by four walls.
    pub(crate) fn new(dimensions: MazeDimensions) -> Self {
        let cells = dimensions.cells().map(Cell::new).collect();
        Self { dimensions, cells }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Cell stored at the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.dimensions
            .index(coord)
            .and_then(|index| self.cells.get(index))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Wall flags of every cell in row-major order.
    #[must_use]
    pub fn walls(&self) -> Vec<CellWalls> {
        self.cells.iter().map(Cell::walls).collect()
    }

    /// Reports whether a passage leads from `from` to its neighbour in `direction`.
    #[must_use]
    pub fn is_passage(&self, from: CellCoord, direction: Direction) -> bool {
        let Some(to) = from.offset(direction, 1, self.dimensions) else {
            return false;
        };
        match (self.cell(from), self.cell(to)) {
            (Some(a), Some(b)) => !a.has_wall(direction) && !b.has_wall(direction.opposite()),
            _ => false,
        }
    }

    /// Counts the open passages between adjacent cells.
    #[must_use]
    pub fn open_passages(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                let coord = cell.coord();
                usize::from(self.is_passage(coord, Direction::Right))
                    + usize::from(self.is_passage(coord, Direction::Down))
            })
            .sum()
    }

    /// Opens the shared wall between two orthogonally adjacent cells.
    ///
    /// Returns `false` and leaves the grid untouched when the cells are not
    /// adjacent or either lies outside the grid.
    pub(crate) fn remove_wall_between(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(direction) = a.direction_to(b) else {
            return false;
        };
        let (Some(first), Some(second)) = (self.dimensions.index(a), self.dimensions.index(b))
        else {
            return false;
        };

        self.cells[first].open(direction);
        self.cells[second].open(direction.opposite());
        true
    }

    /// In-bounds orthogonal neighbours of the coordinate.
    pub(crate) fn neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| coord.offset(direction, 1, self.dimensions))
    }

    pub(crate) fn is_visited(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.visited)
    }

    pub(crate) fn mark_visited(&mut self, coord: CellCoord) {
        if let Some(index) = self.dimensions.index(coord) {
            self.cells[index].visited = true;
        }
    }

    pub(crate) fn clear_visited(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_fully_walled() {
        let grid = Grid::new(MazeDimensions::new(3, 2));
        assert_eq!(grid.cells().len(), 6);
        assert!(grid.cells().iter().all(|cell| cell.walls() == CellWalls::CLOSED));
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn wall_removal_clears_exactly_the_facing_pair() {
        let mut grid = Grid::new(MazeDimensions::new(3, 3));
        let a = CellCoord::new(1, 1);
        let b = CellCoord::new(1, 2);

        assert!(grid.remove_wall_between(a, b));

        let first = grid.cell(a).expect("cell a").walls();
        let second = grid.cell(b).expect("cell b").walls();
        assert_eq!(
            first,
            CellWalls {
                bottom: false,
                ..CellWalls::CLOSED
            }
        );
        assert_eq!(
            second,
            CellWalls {
                top: false,
                ..CellWalls::CLOSED
            }
        );
        assert!(grid.is_passage(a, Direction::Down));
        assert!(grid.is_passage(b, Direction::Up));
        assert_eq!(grid.open_passages(), 1);
    }

    #[test]
    fn wall_removal_ignores_non_adjacent_cells() {
        let mut grid = Grid::new(MazeDimensions::new(3, 3));
        assert!(!grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(1, 1)));
        assert!(!grid.remove_wall_between(CellCoord::new(2, 2), CellCoord::new(3, 2)));
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn neighbors_stay_inside_the_grid() {
        let grid = Grid::new(MazeDimensions::new(2, 2));
        let corner: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
    }

    #[test]
    fn visited_flags_reset() {
        let mut grid = Grid::new(MazeDimensions::new(2, 1));
        grid.mark_visited(CellCoord::new(1, 0));
        assert!(grid.is_visited(CellCoord::new(1, 0)));
        grid.clear_visited();
        assert!(!grid.is_visited(CellCoord::new(1, 0)));
    }
}
