#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Motion Maze engine.
//!
//! This crate defines the message surface that connects input adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intent, the world resolves those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems and
//! adapters react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Motion Maze.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Resets level and score, builds a fresh base-size maze and enters play.
    StartNewGame,
    /// Movement signal delivered by an input source.
    Move {
        /// Direction the player intends to travel.
        direction: Direction,
    },
    /// Button signal delivered by an input source.
    PressButton,
    /// Motion-trigger signal delivered by the remote sensor.
    TriggerMotion,
    /// Explicit pause input. Only meaningful while playing.
    Pause,
    /// Places the player directly on a cell, bypassing status effects.
    Teleport {
        /// Destination cell.
        cell: CellCoord,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Inserts a power-up into the live maze.
    SpawnPowerUp {
        /// Cell receiving the power-up.
        cell: CellCoord,
        /// Type of power-up to insert.
        kind: PowerUpKind,
    },
    /// Inserts an obstacle into the live maze.
    SpawnObstacle {
        /// Cell receiving the obstacle.
        cell: CellCoord,
        /// Type of obstacle to insert.
        kind: ObstacleKind,
    },
    /// Removes a status effect from the player.
    ClearStatus {
        /// Effect to clear.
        effect: StatusEffect,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a game state became active and ran its entry hook.
    StateEntered {
        /// State that is now active.
        state: GameStateKind,
    },
    /// Confirms that a new game started from level one.
    GameStarted {
        /// Dimensions of the freshly generated maze.
        dimensions: MazeDimensions,
    },
    /// Confirms that the player advanced to a new level.
    LevelStarted {
        /// Level that became active.
        level: u32,
        /// Dimensions of the freshly generated maze.
        dimensions: MazeDimensions,
    },
    /// Confirms that the player changed cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Reports that the player collided with an obstacle.
    ObstacleHit {
        /// Cell where the obstacle stood.
        cell: CellCoord,
        /// Type of obstacle that was consumed.
        kind: ObstacleKind,
        /// Health actually removed from the player.
        damage: u32,
    },
    /// Reports that the player collected a power-up.
    PowerUpCollected {
        /// Cell where the power-up stood.
        cell: CellCoord,
        /// Type of power-up that was consumed.
        kind: PowerUpKind,
        /// Resolution path that picked the power-up up.
        route: PickupRoute,
    },
    /// Confirms that a button press was scored while playing.
    ButtonAcknowledged,
    /// Confirms that a motion trigger was scored while playing.
    MotionDetected,
    /// Asks the event spawner to inject a random entity.
    SpawnRequested,
    /// Confirms that a power-up was inserted into the live maze.
    PowerUpSpawned {
        /// Cell receiving the power-up.
        cell: CellCoord,
        /// Type of power-up inserted.
        kind: PowerUpKind,
    },
    /// Confirms that an obstacle was inserted into the live maze.
    ObstacleSpawned {
        /// Cell receiving the obstacle.
        cell: CellCoord,
        /// Type of obstacle inserted.
        kind: ObstacleKind,
    },
    /// Reports that a status effect became active.
    StatusApplied {
        /// Effect that became active.
        effect: StatusEffect,
        /// Advisory expiry measured on the simulation clock.
        expires_at: Duration,
    },
    /// Reports that the shield absorbed a harmful effect and was consumed.
    ShieldConsumed,
    /// Reports that a status effect was removed.
    StatusCleared {
        /// Effect that was removed.
        effect: StatusEffect,
    },
    /// Announces that the player reached the finish cell.
    LevelCompleted {
        /// Level that was completed.
        level: u32,
    },
    /// Announces that the player's health ran out.
    GameOver {
        /// Level reached when the game ended.
        level: u32,
        /// Final score.
        score: i64,
    },
}

/// Resolution path that picked up a power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupRoute {
    /// Collected at the end of a regular movement resolution.
    Movement,
    /// Collected after a direct teleport.
    Teleport,
}

impl PickupRoute {
    /// Score awarded for collecting a power-up through this route.
    #[must_use]
    pub const fn score_award(self) -> i64 {
        match self {
            Self::Movement => 25,
            Self::Teleport => 10,
        }
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in clockwise order starting from `Up`.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Unit column and row offsets for the direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Offsets the coordinate by `steps` cells in `direction`.
    ///
    /// Returns `None` when the result would fall outside the provided bounds.
    #[must_use]
    pub fn offset(
        self,
        direction: Direction,
        steps: u32,
        dimensions: MazeDimensions,
    ) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let steps = i64::from(steps);
        let column = i64::from(self.column) + dx * steps;
        let row = i64::from(self.row) + dy * steps;
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        let cell = Self::new(column, row);
        dimensions.contains(cell).then_some(cell)
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        if self.manhattan_distance(other) != 1 {
            return None;
        }

        if other.column > self.column {
            Some(Direction::Right)
        } else if other.column < self.column {
            Some(Direction::Left)
        } else if other.row > self.row {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Width and height of a maze measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeDimensions {
    columns: u32,
    rows: u32,
}

impl MazeDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the cell lies inside the maze.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major index of the cell, if it lies inside the maze.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Collectible power-up variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Restores 25 health.
    Health,
    /// Grants the hastened status.
    Speed,
    /// Hands the player a key.
    Key,
    /// Awards 50 bonus points.
    ScoreBoost,
    /// Grants the shielded status.
    Invincibility,
}

impl PowerUpKind {
    /// Every power-up variant, used for uniform selection.
    pub const ALL: [PowerUpKind; 5] = [
        Self::Health,
        Self::Speed,
        Self::Key,
        Self::ScoreBoost,
        Self::Invincibility,
    ];
}

/// Hazard variants that harm or hinder the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Deals 10 damage.
    Trap,
    /// Deals 20 damage.
    Enemy,
    /// Deals 30 damage.
    Pit,
    /// Deals 15 damage.
    Fire,
    /// Deals no damage but slows the player.
    Ice,
}

impl ObstacleKind {
    /// Every obstacle variant, used for uniform selection.
    pub const ALL: [ObstacleKind; 5] = [Self::Trap, Self::Enemy, Self::Pit, Self::Fire, Self::Ice];

    /// Damage the obstacle inflicts on an unshielded player.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Trap => 10,
            Self::Enemy => 20,
            Self::Pit => 30,
            Self::Fire => 15,
            Self::Ice => 0,
        }
    }
}

/// Temporary player conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Movement is suppressed entirely.
    Trapped,
    /// The next harmful effect is absorbed.
    Shielded,
    /// Half of all movement attempts are dropped.
    Slowed,
    /// Movement displacement is doubled.
    Hastened,
}

impl StatusEffect {
    /// Every status effect.
    pub const ALL: [StatusEffect; 4] = [
        Self::Trapped,
        Self::Shielded,
        Self::Slowed,
        Self::Hastened,
    ];
}

/// Tag identifying the active game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStateKind {
    /// Inputs drive movement and scoring.
    Playing,
    /// Play is suspended until the button resumes it.
    Paused,
    /// Health ran out; the button restarts from level one.
    GameOver,
    /// The finish was reached; the button advances to the next level.
    Completed,
}

/// Semantic feedback requests handed to the actuator collaborator.
///
/// The core only names what happened; wire encoding belongs to the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActuatorCue {
    /// A new game started.
    GameStarted,
    /// Play became active.
    Playing,
    /// The player hit an obstacle.
    Collision,
    /// The player collected a power-up.
    PowerUpCollected,
    /// A power-up was spawned mid-game.
    PowerUpSpawned {
        /// Servo position 0–15 derived from the spawn cell.
        servo: u8,
    },
    /// An obstacle was spawned mid-game.
    ObstacleSpawned {
        /// Servo position 0–15 derived from the spawn cell.
        servo: u8,
    },
    /// The player reached the finish cell.
    LevelCompleted,
    /// The player's health ran out.
    GameOver,
    /// A button press was scored.
    ButtonAcknowledged,
    /// A motion trigger was scored.
    MotionAcknowledged,
}

/// Wall flags of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellWalls {
    /// Wall toward decreasing rows.
    pub top: bool,
    /// Wall toward increasing columns.
    pub right: bool,
    /// Wall toward increasing rows.
    pub bottom: bool,
    /// Wall toward decreasing columns.
    pub left: bool,
}

impl CellWalls {
    /// Walls on all four sides.
    pub const CLOSED: CellWalls = CellWalls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    /// Reports whether the wall facing `direction` is present.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }
}

/// Immutable representation of a live power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUpSnapshot {
    /// Cell holding the power-up.
    pub cell: CellCoord,
    /// Type of the power-up.
    pub kind: PowerUpKind,
}

/// Immutable representation of a live obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    /// Cell holding the obstacle.
    pub cell: CellCoord,
    /// Type of the obstacle.
    pub kind: ObstacleKind,
}

/// Read-only snapshot of the maze layout and its live entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    /// Maze dimensions.
    pub dimensions: MazeDimensions,
    /// Level the maze was generated for.
    pub level: u32,
    /// Starting cell.
    pub start: CellCoord,
    /// Finish cell.
    pub finish: CellCoord,
    /// Wall flags in row-major order.
    pub walls: Vec<CellWalls>,
    /// Live power-ups in insertion order.
    pub power_ups: Vec<PowerUpSnapshot>,
    /// Live obstacles in insertion order.
    pub obstacles: Vec<ObstacleSnapshot>,
}

impl MazeSnapshot {
    /// Wall flags of the provided cell.
    #[must_use]
    pub fn walls_at(&self, cell: CellCoord) -> Option<CellWalls> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.walls.get(index).copied())
    }

    /// First live power-up occupying the cell, if any.
    #[must_use]
    pub fn power_up_at(&self, cell: CellCoord) -> Option<PowerUpKind> {
        self.power_ups
            .iter()
            .find(|power_up| power_up.cell == cell)
            .map(|power_up| power_up.kind)
    }

    /// First live obstacle occupying the cell, if any.
    #[must_use]
    pub fn obstacle_at(&self, cell: CellCoord) -> Option<ObstacleKind> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.cell == cell)
            .map(|obstacle| obstacle.kind)
    }
}

/// Active status effects with their advisory expiry instants.
///
/// Each effect keeps its own expiry; applying one never overwrites another's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Expiry of the trapped status, if active.
    pub trapped: Option<Duration>,
    /// Expiry of the shielded status, if active.
    pub shielded: Option<Duration>,
    /// Expiry of the slowed status, if active.
    pub slowed: Option<Duration>,
    /// Expiry of the hastened status, if active.
    pub hastened: Option<Duration>,
}

impl StatusFlags {
    /// Expiry recorded for the effect, if it is active.
    #[must_use]
    pub const fn expiry(&self, effect: StatusEffect) -> Option<Duration> {
        match effect {
            StatusEffect::Trapped => self.trapped,
            StatusEffect::Shielded => self.shielded,
            StatusEffect::Slowed => self.slowed,
            StatusEffect::Hastened => self.hastened,
        }
    }

    /// Reports whether the effect is active.
    #[must_use]
    pub const fn is_active(&self, effect: StatusEffect) -> bool {
        self.expiry(effect).is_some()
    }

    /// Iterates the active effects in declaration order.
    pub fn active(&self) -> impl Iterator<Item = StatusEffect> + '_ {
        StatusEffect::ALL
            .into_iter()
            .filter(move |effect| self.is_active(*effect))
    }
}

/// Read-only snapshot of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Cell the player occupies.
    pub cell: CellCoord,
    /// Remaining health in `0..=100`.
    pub health: u32,
    /// Current score, possibly negative.
    pub score: i64,
    /// Whether the player holds a key.
    pub has_key: bool,
    /// Active status effects.
    pub status: StatusFlags,
}

/// Read-only snapshot of the whole game pushed to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Active state tag.
    pub state: GameStateKind,
    /// Current level.
    pub level: u32,
    /// Simulation clock.
    pub clock: Duration,
    /// Whether a motion trigger was seen since the last tick.
    pub motion_detected: bool,
    /// Maze layout and entities.
    pub maze: MazeSnapshot,
    /// Player state.
    pub player: PlayerSnapshot,
}
