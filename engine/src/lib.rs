#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestration layer that drives the Motion Maze world.
//!
//! The engine owns the world and the pure systems. Each submitted command is
//! resolved to completion: the world applies it, systems react to the
//! resulting events with follow-up commands, and the cascade repeats until no
//! commands remain. Afterwards actuator cues are dispatched and observers are
//! notified with a committed snapshot.

mod runtime;

use std::collections::VecDeque;

use motion_maze_core::{
    ActuatorCue, CellCoord, Command, Event, GameSnapshot, GameStateKind, MazeDimensions,
};
use motion_maze_system_event_spawner::{self as event_spawner, BoardView, EventSpawner};
use motion_maze_system_status_decay::{self as status_decay, StatusDecay};
use motion_maze_world::{self as world, query, MazeError, World, WorldConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use runtime::{EngineHandle, Submitter};

const SPAWNER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const DECAY_SEED_SALT: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Errors surfaced by the engine and its runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The world could not build its maze.
    #[error("failed to construct the world")]
    World(#[from] MazeError),
    /// The runtime no longer accepts signals.
    #[error("engine is shutting down")]
    ShuttingDown,
    /// The worker thread panicked before returning the engine.
    #[error("engine worker terminated unexpectedly")]
    WorkerPanicked,
}

/// Receives a committed snapshot after every resolution.
pub trait Observer: Send {
    /// Called once per resolution with the snapshot and the events it produced.
    fn on_update(&mut self, snapshot: &GameSnapshot, events: &[Event]);
}

/// Fire-and-forget sink for actuator feedback.
pub trait ActuatorLink: Send {
    /// Hands a cue to the actuator without waiting for delivery.
    fn dispatch(&mut self, cue: ActuatorCue);
}

/// Handle returned by [`Engine::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the world, its systems and its collaborators.
pub struct Engine {
    world: World,
    spawner: EventSpawner,
    decay: StatusDecay,
    observers: Vec<(SubscriptionId, Box<dyn Observer>)>,
    next_subscription: u64,
    actuator: Option<Box<dyn ActuatorLink>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("world", &self.world)
            .field("observers", &self.observers.len())
            .field("actuator", &self.actuator.is_some())
            .finish()
    }
}

impl Engine {
    /// Creates an engine whose systems derive their seeds from the world seed.
    pub fn new(config: WorldConfig) -> Result<Self, EngineError> {
        let seed = config.rng_seed();
        let world = World::new(config)?;
        Ok(Self {
            world,
            spawner: EventSpawner::new(event_spawner::Config::new(seed ^ SPAWNER_SEED_SALT)),
            decay: StatusDecay::new(status_decay::Config::new(seed ^ DECAY_SEED_SALT)),
            observers: Vec::new(),
            next_subscription: 0,
            actuator: None,
        })
    }

    /// Installs the actuator that receives feedback cues.
    pub fn set_actuator(&mut self, actuator: Box<dyn ActuatorLink>) {
        self.actuator = Some(actuator);
    }

    /// Registers an observer notified after every resolution.
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer, reporting whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Captures a snapshot of the committed game state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        query::snapshot(&self.world)
    }

    /// Starts a new game from level one.
    pub fn start(&mut self) -> Vec<Event> {
        info!(banner = query::welcome_banner(&self.world), "game_starting");
        self.resolve(Command::StartNewGame)
    }

    /// Resolves a command and every follow-up command it triggers.
    pub fn resolve(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = VecDeque::from([command]);

        while let Some(command) = pending.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            if events.is_empty() {
                continue;
            }

            let mut follow_up = Vec::new();
            self.run_systems(&events, &mut follow_up);
            pending.extend(follow_up);
            log.extend(events);
        }

        if !log.is_empty() {
            self.publish(&log);
        }
        log
    }

    fn run_systems(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let state = query::game_state(&self.world);
        let maze = query::maze(&self.world);
        let player = query::player(&self.world);
        let world = &self.world;

        let dropped = self.spawner.dropped_requests();
        self.spawner.handle(
            events,
            state,
            BoardView {
                dimensions: maze.dimensions(),
                player: player.cell(),
                is_occupied: |cell: CellCoord| query::is_occupied(world, cell),
            },
            out,
        );
        if self.spawner.dropped_requests() > dropped {
            warn!(
                dropped = self.spawner.dropped_requests(),
                "spawn_request_dropped_no_free_cell"
            );
        }

        self.decay.handle(events, state, player.status(), out);
    }

    fn publish(&mut self, events: &[Event]) {
        let dimensions = query::maze(&self.world).dimensions();
        for event in events {
            debug!(?event, "event_resolved");
            match event {
                Event::StateEntered { state } => info!(?state, "state_entered"),
                Event::LevelStarted { level, dimensions } => info!(
                    level,
                    columns = dimensions.columns(),
                    rows = dimensions.rows(),
                    "level_started"
                ),
                Event::GameOver { level, score } => info!(level, score, "game_over"),
                _ => {}
            }

            let cue = cue_for(event, dimensions);
            if let (Some(actuator), Some(cue)) = (self.actuator.as_mut(), cue) {
                actuator.dispatch(cue);
            }
        }

        if self.observers.is_empty() {
            return;
        }
        let snapshot = query::snapshot(&self.world);
        for (_, observer) in &mut self.observers {
            observer.on_update(&snapshot, events);
        }
    }
}

/// Maps a resolved event to the actuator cue it should trigger, if any.
#[must_use]
pub fn cue_for(event: &Event, dimensions: MazeDimensions) -> Option<ActuatorCue> {
    let cue = match *event {
        Event::GameStarted { .. } => ActuatorCue::GameStarted,
        Event::StateEntered {
            state: GameStateKind::Playing,
        } => ActuatorCue::Playing,
        Event::ObstacleHit { .. } => ActuatorCue::Collision,
        Event::PowerUpCollected { .. } => ActuatorCue::PowerUpCollected,
        Event::PowerUpSpawned { cell, .. } => ActuatorCue::PowerUpSpawned {
            servo: servo_position(cell, dimensions),
        },
        Event::ObstacleSpawned { cell, .. } => ActuatorCue::ObstacleSpawned {
            servo: servo_position(cell, dimensions),
        },
        Event::LevelCompleted { .. } => ActuatorCue::LevelCompleted,
        Event::GameOver { .. } => ActuatorCue::GameOver,
        Event::ButtonAcknowledged => ActuatorCue::ButtonAcknowledged,
        Event::MotionDetected => ActuatorCue::MotionAcknowledged,
        _ => return None,
    };
    Some(cue)
}

/// Servo position in `0..16` that points at a spawn cell.
#[must_use]
pub fn servo_position(cell: CellCoord, dimensions: MazeDimensions) -> u8 {
    let index = u64::from(cell.column()) * u64::from(dimensions.rows()) + u64::from(cell.row());
    (index % 16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servo_position_wraps_into_nibble() {
        let dimensions = MazeDimensions::new(10, 10);
        assert_eq!(servo_position(CellCoord::new(0, 3), dimensions), 3);
        assert_eq!(servo_position(CellCoord::new(1, 5), dimensions), 15);
        assert_eq!(servo_position(CellCoord::new(1, 6), dimensions), 0);
        assert_eq!(servo_position(CellCoord::new(9, 9), dimensions), 99 % 16);
    }

    #[test]
    fn only_feedback_events_map_to_cues() {
        let dimensions = MazeDimensions::new(10, 10);
        assert_eq!(
            cue_for(
                &Event::StateEntered {
                    state: GameStateKind::Playing
                },
                dimensions
            ),
            Some(ActuatorCue::Playing)
        );
        assert_eq!(
            cue_for(
                &Event::StateEntered {
                    state: GameStateKind::Paused
                },
                dimensions
            ),
            None
        );
        assert_eq!(cue_for(&Event::SpawnRequested, dimensions), None);
        assert_eq!(
            cue_for(&Event::MotionDetected, dimensions),
            Some(ActuatorCue::MotionAcknowledged)
        );
        assert_eq!(
            cue_for(
                &Event::ObstacleSpawned {
                    cell: CellCoord::new(2, 1),
                    kind: motion_maze_core::ObstacleKind::Ice
                },
                dimensions
            ),
            Some(ActuatorCue::ObstacleSpawned { servo: 5 })
        );
    }
}
