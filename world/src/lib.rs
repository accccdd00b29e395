#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Motion Maze.
//!
//! The world owns the maze, the player, the simulation clock and the active
//! game state. It is mutated exclusively through [`apply`] and observed through
//! the [`query`] module.

mod entities;
mod generation;
mod grid;
mod maze;
mod player;
mod rules;
mod state;

use std::time::Duration;

use motion_maze_core::{Command, Event, GameStateKind, MazeDimensions, WELCOME_BANNER};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use entities::{DelegatedEffect, Obstacle, ObstacleOutcome, PowerUp};
pub use grid::{Cell, Grid};
pub use maze::{Maze, MazeError};
pub use player::{DamageOutcome, EffectOutcome, Player, MAX_HEALTH};

use state::GameState;

const DEFAULT_BASE_DIMENSIONS: MazeDimensions = MazeDimensions::new(10, 10);

/// Durations granted to timed status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectDurations {
    /// Lifetime of the hastened status.
    pub haste: Duration,
    /// Lifetime of the shielded status.
    pub shield: Duration,
    /// Lifetime of the slowed status.
    pub slow: Duration,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            haste: Duration::from_secs(5),
            shield: Duration::from_secs(5),
            slow: Duration::from_secs(3),
        }
    }
}

/// Construction parameters for a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    rng_seed: u64,
    base_dimensions: MazeDimensions,
    respect_walls: bool,
    durations: EffectDurations,
}

impl WorldConfig {
    /// Creates a configuration with default rules seeded by `rng_seed`.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            base_dimensions: DEFAULT_BASE_DIMENSIONS,
            respect_walls: false,
            durations: EffectDurations::default(),
        }
    }

    /// Overrides the level-one maze dimensions.
    #[must_use]
    pub const fn with_base_dimensions(mut self, dimensions: MazeDimensions) -> Self {
        self.base_dimensions = dimensions;
        self
    }

    /// Makes maze walls block movement.
    #[must_use]
    pub const fn with_respect_walls(mut self, respect_walls: bool) -> Self {
        self.respect_walls = respect_walls;
        self
    }

    /// Overrides the status effect durations.
    #[must_use]
    pub const fn with_durations(mut self, durations: EffectDurations) -> Self {
        self.durations = durations;
        self
    }

    /// Seed of the world's random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Level-one maze dimensions; later levels grow from here.
    #[must_use]
    pub const fn base_dimensions(&self) -> MazeDimensions {
        self.base_dimensions
    }

    /// Whether maze walls block movement.
    #[must_use]
    pub const fn respect_walls(&self) -> bool {
        self.respect_walls
    }

    /// Status effect durations.
    #[must_use]
    pub const fn durations(&self) -> EffectDurations {
        self.durations
    }
}

/// Represents the authoritative Motion Maze world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    state: GameState,
    maze: Maze,
    player: Player,
    clock: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a playing world on a freshly generated level-one maze.
    pub fn new(config: WorldConfig) -> Result<Self, MazeError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let maze = Maze::generate(config.base_dimensions, 1, &mut rng)?;
        let player = Player::new(maze.start());
        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            state: GameState::entering(GameStateKind::Playing),
            maze,
            player,
            clock: Duration::ZERO,
            rng,
        })
    }

    fn enter(&mut self, kind: GameStateKind, out_events: &mut Vec<Event>) {
        self.state = GameState::entering(kind);
        out_events.push(Event::StateEntered { state: kind });
        self.state.on_enter(self, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let state = world.state;
    let next = match command {
        Command::StartNewGame => {
            world.restart(out_events);
            Some(GameStateKind::Playing)
        }
        Command::Move { direction } => state.on_move(world, direction, out_events),
        Command::PressButton => state.on_button(world, out_events),
        Command::TriggerMotion => state.on_motion(world, out_events),
        Command::Pause => state.on_pause(),
        Command::Teleport { cell } => state.on_teleport(world, cell, out_events),
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            state.on_tick(world, out_events)
        }
        Command::SpawnPowerUp { cell, kind } => {
            world.spawn_power_up(PowerUp::new(cell, kind), out_events);
            None
        }
        Command::SpawnObstacle { cell, kind } => {
            world.spawn_obstacle(Obstacle::new(cell, kind), out_events);
            None
        }
        Command::ClearStatus { effect } => {
            if world.player.clear(effect) {
                out_events.push(Event::StatusCleared { effect });
            }
            None
        }
    };

    if let Some(kind) = next {
        world.enter(kind, out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use motion_maze_core::{CellCoord, GameSnapshot, GameStateKind};

    use super::{Maze, Player, World, WorldConfig};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Tag of the active game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameStateKind {
        world.state.kind()
    }

    /// Current level.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.maze.level()
    }

    /// Simulation clock.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Whether a motion trigger was seen since the last tick.
    #[must_use]
    pub fn motion_detected(world: &World) -> bool {
        world.state.motion_detected()
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Provides read-only access to the live maze.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Reports whether a live power-up or obstacle occupies `cell`.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellCoord) -> bool {
        world.maze.is_occupied(cell)
    }

    /// Captures a complete read-only snapshot of the game.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            state: world.state.kind(),
            level: world.maze.level(),
            clock: world.clock,
            motion_detected: world.state.motion_detected(),
            maze: world.maze.snapshot(),
            player: world.player.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use motion_maze_core::{CellCoord, PowerUpKind};

    use super::*;

    #[test]
    fn new_world_starts_playing_on_base_maze() {
        let world = World::new(WorldConfig::new(1)).expect("world");
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::game_state(&world), GameStateKind::Playing);
        assert_eq!(query::level(&world), 1);
        assert_eq!(query::maze(&world).dimensions(), DEFAULT_BASE_DIMENSIONS);
        assert_eq!(query::player(&world).cell(), CellCoord::new(0, 0));
        assert_eq!(query::player(&world).health(), MAX_HEALTH);
    }

    #[test]
    fn degenerate_base_dimensions_fail_fast() {
        let config = WorldConfig::new(1).with_base_dimensions(MazeDimensions::new(0, 3));
        assert!(matches!(
            World::new(config),
            Err(MazeError::DegenerateDimensions { columns: 0, rows: 3 })
        ));
    }

    #[test]
    fn motion_flag_clears_on_tick() {
        let mut world = World::new(WorldConfig::new(2)).expect("world");
        let mut events = Vec::new();

        apply(&mut world, Command::TriggerMotion, &mut events);
        assert!(query::motion_detected(&world));
        assert_eq!(query::player(&world).score(), 5);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert!(!query::motion_detected(&world));
        assert_eq!(query::clock(&world), Duration::from_millis(16));
    }

    #[test]
    fn spawns_outside_the_maze_are_ignored() {
        let mut world = World::new(WorldConfig::new(3)).expect("world");
        let before = query::maze(&world).power_ups().len();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: CellCoord::new(10, 0),
                kind: PowerUpKind::Key,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::maze(&world).power_ups().len(), before);
    }

    #[test]
    fn snapshot_reflects_world() {
        let world = World::new(WorldConfig::new(4)).expect("world");
        let snapshot = query::snapshot(&world);
        assert_eq!(snapshot.state, GameStateKind::Playing);
        assert_eq!(snapshot.player, query::player(&world).snapshot());
        assert_eq!(snapshot.maze, query::maze(&world).snapshot());
        assert_eq!(snapshot.player.cell, snapshot.maze.start);
    }
}
