#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised mid-game injection of power-ups and obstacles.
//!
//! The spawner reacts to [`Event::SpawnRequested`] by picking a free cell and
//! emitting a spawn command. A cell is free when it lies inside the maze, is
//! not the player's cell and holds no live entity.

use motion_maze_core::{
    CellCoord, Command, Event, GameStateKind, MazeDimensions, ObstacleKind, PowerUpKind,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PLACEMENT_ATTEMPTS: usize = 64;
const POWER_UP_CHANCE: f64 = 0.5;

/// Configuration parameters required to construct the event spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Read-only view of the board the spawner places entities on.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<F> {
    /// Dimensions of the live maze.
    pub dimensions: MazeDimensions,
    /// Cell the player occupies.
    pub player: CellCoord,
    /// Reports whether a live entity occupies a cell.
    pub is_occupied: F,
}

/// Pure system that answers spawn requests with spawn commands.
#[derive(Debug)]
pub struct EventSpawner {
    rng: ChaCha8Rng,
    dropped_requests: u64,
}

impl EventSpawner {
    /// Creates a new event spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            dropped_requests: 0,
        }
    }

    /// Number of requests dropped because the board had no free cell.
    #[must_use]
    pub const fn dropped_requests(&self) -> u64 {
        self.dropped_requests
    }

    /// Consumes events and the board view to emit spawn commands.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        state: GameStateKind,
        board: BoardView<F>,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        if state != GameStateKind::Playing {
            return;
        }

        let mut claimed: Vec<CellCoord> = Vec::new();
        for event in events {
            if *event != Event::SpawnRequested {
                continue;
            }

            let is_free = |cell: CellCoord| {
                cell != board.player && !(board.is_occupied)(cell) && !claimed.contains(&cell)
            };
            let Some(cell) = self.select_cell(board.dimensions, is_free) else {
                self.dropped_requests = self.dropped_requests.saturating_add(1);
                continue;
            };

            claimed.push(cell);
            out.push(self.spawn_command(cell));
        }
    }

    fn spawn_command(&mut self, cell: CellCoord) -> Command {
        if self.rng.gen_bool(POWER_UP_CHANCE) {
            let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
            Command::SpawnPowerUp { cell, kind }
        } else {
            let kind = ObstacleKind::ALL[self.rng.gen_range(0..ObstacleKind::ALL.len())];
            Command::SpawnObstacle { cell, kind }
        }
    }

    fn select_cell<F>(&mut self, dimensions: MazeDimensions, is_free: F) -> Option<CellCoord>
    where
        F: Fn(CellCoord) -> bool,
    {
        if dimensions.columns() == 0 || dimensions.rows() == 0 {
            return None;
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let cell = CellCoord::new(
                self.rng.gen_range(0..dimensions.columns()),
                self.rng.gen_range(0..dimensions.rows()),
            );
            if is_free(cell) {
                return Some(cell);
            }
        }

        let free: Vec<CellCoord> = dimensions.cells().filter(|cell| is_free(*cell)).collect();
        free.choose(&mut self.rng).copied()
    }
}
