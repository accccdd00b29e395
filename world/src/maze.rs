//! A generated maze together with its live entities.

use motion_maze_core::{CellCoord, Direction, MazeDimensions, MazeSnapshot};
use rand::Rng;
use thiserror::Error;

use crate::{
    entities::{Obstacle, PowerUp},
    generation,
    grid::Grid,
};

/// Errors raised while constructing a maze.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// One of the requested dimensions is zero.
    #[error("maze dimensions {columns}x{rows} must both be non-zero")]
    DegenerateDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Perfect maze for a single level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    level: u32,
    start: CellCoord,
    finish: CellCoord,
    power_ups: Vec<PowerUp>,
    obstacles: Vec<Obstacle>,
}

impl Maze {
    /// Generates a maze for `level` and scatters its initial entities.
    pub fn generate<R: Rng + ?Sized>(
        dimensions: MazeDimensions,
        level: u32,
        rng: &mut R,
    ) -> Result<Self, MazeError> {
        if dimensions.columns() == 0 || dimensions.rows() == 0 {
            return Err(MazeError::DegenerateDimensions {
                columns: dimensions.columns(),
                rows: dimensions.rows(),
            });
        }
        Ok(Self::generate_unchecked(dimensions, level, rng))
    }

    /// Generates a maze whose dimensions are already known to be non-zero.
    pub(crate) fn generate_unchecked<R: Rng + ?Sized>(
        dimensions: MazeDimensions,
        level: u32,
        rng: &mut R,
    ) -> Self {
        let mut maze = Self::walled(dimensions, level);
        generation::carve_passages(&mut maze.grid, rng);
        generation::scatter_entities(&mut maze, rng);
        maze
    }

    /// Fully walled maze without entities.
    pub(crate) fn walled(dimensions: MazeDimensions, level: u32) -> Self {
        Self {
            grid: Grid::new(dimensions),
            level,
            start: CellCoord::new(0, 0),
            finish: CellCoord::new(
                dimensions.columns().saturating_sub(1),
                dimensions.rows().saturating_sub(1),
            ),
            power_ups: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Underlying cell grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Dimensions of the maze.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.grid.dimensions()
    }

    /// Level the maze was generated for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Starting cell.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Finish cell.
    #[must_use]
    pub const fn finish(&self) -> CellCoord {
        self.finish
    }

    /// Reports whether `cell` is the finish.
    #[must_use]
    pub fn is_finish(&self, cell: CellCoord) -> bool {
        self.finish == cell
    }

    /// Reports whether `cell` lies inside the maze.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.grid.dimensions().contains(cell)
    }

    /// Reports whether a passage leads from `from` toward `direction`.
    #[must_use]
    pub fn is_passage(&self, from: CellCoord, direction: Direction) -> bool {
        self.grid.is_passage(from, direction)
    }

    /// Live power-ups in insertion order.
    #[must_use]
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    /// Live obstacles in insertion order.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// First live power-up on `cell`.
    #[must_use]
    pub fn power_up_at(&self, cell: CellCoord) -> Option<&PowerUp> {
        self.power_ups.iter().find(|power_up| power_up.cell() == cell)
    }

    /// First live obstacle on `cell`.
    #[must_use]
    pub fn obstacle_at(&self, cell: CellCoord) -> Option<&Obstacle> {
        self.obstacles.iter().find(|obstacle| obstacle.cell() == cell)
    }

    /// Reports whether any live entity occupies `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.power_up_at(cell).is_some() || self.obstacle_at(cell).is_some()
    }

    pub(crate) fn add_power_up(&mut self, power_up: PowerUp) {
        self.power_ups.push(power_up);
    }

    pub(crate) fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Removes and returns the first power-up on `cell`.
    pub(crate) fn take_power_up_at(&mut self, cell: CellCoord) -> Option<PowerUp> {
        let index = self
            .power_ups
            .iter()
            .position(|power_up| power_up.cell() == cell)?;
        Some(self.power_ups.remove(index))
    }

    /// Removes and returns the first obstacle on `cell`.
    pub(crate) fn take_obstacle_at(&mut self, cell: CellCoord) -> Option<Obstacle> {
        let index = self
            .obstacles
            .iter()
            .position(|obstacle| obstacle.cell() == cell)?;
        Some(self.obstacles.remove(index))
    }

    /// Read-only snapshot of the layout and live entities.
    #[must_use]
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            dimensions: self.dimensions(),
            level: self.level,
            start: self.start,
            finish: self.finish,
            walls: self.grid.walls(),
            power_ups: self.power_ups.iter().map(PowerUp::snapshot).collect(),
            obstacles: self.obstacles.iter().map(Obstacle::snapshot).collect(),
        }
    }
}
