//! Game-level state machine.
//!
//! Every state interprets the same input signals. Handlers mutate the world
//! directly and return the state to transition into, if any; the caller
//! commits the transition and runs the entry hook.

use motion_maze_core::{CellCoord, Direction, Event, GameStateKind};
use rand::Rng;

use crate::World;

const BUTTON_SCORE: i64 = 10;
const MOTION_SCORE: i64 = 5;
const SPAWN_REQUEST_CHANCE: f64 = 0.3;

/// Active game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GameState {
    Playing {
        /// Set by a motion trigger, cleared on the next tick.
        motion_detected: bool,
    },
    Paused,
    GameOver,
    Completed,
}

impl GameState {
    /// Fresh state for the provided tag.
    pub(crate) const fn entering(kind: GameStateKind) -> Self {
        match kind {
            GameStateKind::Playing => Self::Playing {
                motion_detected: false,
            },
            GameStateKind::Paused => Self::Paused,
            GameStateKind::GameOver => Self::GameOver,
            GameStateKind::Completed => Self::Completed,
        }
    }

    pub(crate) const fn kind(self) -> GameStateKind {
        match self {
            Self::Playing { .. } => GameStateKind::Playing,
            Self::Paused => GameStateKind::Paused,
            Self::GameOver => GameStateKind::GameOver,
            Self::Completed => GameStateKind::Completed,
        }
    }

    pub(crate) const fn motion_detected(self) -> bool {
        matches!(
            self,
            Self::Playing {
                motion_detected: true
            }
        )
    }

    pub(crate) fn on_enter(self, world: &World, out_events: &mut Vec<Event>) {
        match self {
            Self::GameOver => out_events.push(Event::GameOver {
                level: world.maze.level(),
                score: world.player.score(),
            }),
            Self::Completed => out_events.push(Event::LevelCompleted {
                level: world.maze.level(),
            }),
            Self::Playing { .. } | Self::Paused => {}
        }
    }

    pub(crate) fn on_move(
        self,
        world: &mut World,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => world.resolve_movement(direction, out_events),
            Self::Paused | Self::GameOver | Self::Completed => None,
        }
    }

    pub(crate) fn on_button(
        self,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => {
                world.player.add_score(BUTTON_SCORE);
                out_events.push(Event::ButtonAcknowledged);
                if world.rng.gen_bool(SPAWN_REQUEST_CHANCE) {
                    out_events.push(Event::SpawnRequested);
                }
                None
            }
            Self::Paused => Some(GameStateKind::Playing),
            Self::GameOver => {
                world.restart(out_events);
                Some(GameStateKind::Playing)
            }
            Self::Completed => {
                world.advance_level(out_events);
                Some(GameStateKind::Playing)
            }
        }
    }

    pub(crate) fn on_motion(
        self,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => {
                world.player.add_score(MOTION_SCORE);
                world.state = Self::Playing {
                    motion_detected: true,
                };
                out_events.push(Event::MotionDetected);
                None
            }
            Self::Paused | Self::GameOver | Self::Completed => None,
        }
    }

    pub(crate) fn on_pause(self) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => Some(GameStateKind::Paused),
            Self::Paused | Self::GameOver | Self::Completed => None,
        }
    }

    pub(crate) fn on_teleport(
        self,
        world: &mut World,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => world.resolve_teleport(cell, out_events),
            Self::Paused | Self::GameOver | Self::Completed => None,
        }
    }

    pub(crate) fn on_tick(
        self,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        match self {
            Self::Playing { .. } => {
                world.state = Self::Playing {
                    motion_detected: false,
                };
                world.sweep_lingering_obstacles(out_events)
            }
            Self::Paused | Self::GameOver | Self::Completed => None,
        }
    }
}
