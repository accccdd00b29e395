//! Single-use power-ups and obstacles.
//!
//! Entities apply their direct effect to the player and hand timed effects
//! back to the caller, which owns the clock and the configured durations.

use motion_maze_core::{CellCoord, ObstacleKind, ObstacleSnapshot, PowerUpKind, PowerUpSnapshot};

use crate::player::{DamageOutcome, Player};

const HEALTH_RESTORED: u32 = 25;
const SCORE_BOOST: i64 = 50;

/// Timed effect an entity asks its caller to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelegatedEffect {
    /// Grant the hastened status.
    Haste,
    /// Grant the shielded status.
    Shield,
    /// Apply the slowed status.
    Slow,
}

/// Collectible placed on a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUp {
    cell: CellCoord,
    kind: PowerUpKind,
}

impl PowerUp {
    /// Creates a power-up of `kind` on `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: PowerUpKind) -> Self {
        Self { cell, kind }
    }

    /// Cell holding the power-up.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Type of the power-up.
    #[must_use]
    pub const fn kind(&self) -> PowerUpKind {
        self.kind
    }

    /// Read-only snapshot of the power-up.
    #[must_use]
    pub const fn snapshot(&self) -> PowerUpSnapshot {
        PowerUpSnapshot {
            cell: self.cell,
            kind: self.kind,
        }
    }

    pub(crate) fn apply(&self, player: &mut Player) -> Option<DelegatedEffect> {
        match self.kind {
            PowerUpKind::Health => {
                player.heal(HEALTH_RESTORED);
                None
            }
            PowerUpKind::Speed => Some(DelegatedEffect::Haste),
            PowerUpKind::Key => {
                player.set_has_key(true);
                None
            }
            PowerUpKind::ScoreBoost => {
                player.add_score(SCORE_BOOST);
                None
            }
            PowerUpKind::Invincibility => Some(DelegatedEffect::Shield),
        }
    }
}

/// Result of running into an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleOutcome {
    /// Health actually removed.
    pub damage: u32,
    /// Whether the shield absorbed the hit.
    pub shield_consumed: bool,
    /// Timed effect the caller still has to apply.
    pub delegated: Option<DelegatedEffect>,
}

/// Hazard placed on a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Obstacle {
    cell: CellCoord,
    kind: ObstacleKind,
}

impl Obstacle {
    /// Creates an obstacle of `kind` on `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: ObstacleKind) -> Self {
        Self { cell, kind }
    }

    /// Cell holding the obstacle.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Type of the obstacle.
    #[must_use]
    pub const fn kind(&self) -> ObstacleKind {
        self.kind
    }

    /// Read-only snapshot of the obstacle.
    #[must_use]
    pub const fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            cell: self.cell,
            kind: self.kind,
        }
    }

    pub(crate) fn apply(&self, player: &mut Player) -> ObstacleOutcome {
        if self.kind == ObstacleKind::Ice {
            return ObstacleOutcome {
                damage: 0,
                shield_consumed: false,
                delegated: Some(DelegatedEffect::Slow),
            };
        }

        match player.apply_damage(self.kind.damage()) {
            DamageOutcome::Absorbed => ObstacleOutcome {
                damage: 0,
                shield_consumed: true,
                delegated: None,
            },
            DamageOutcome::Applied(damage) => ObstacleOutcome {
                damage,
                shield_consumed: false,
                delegated: None,
            },
        }
    }
}
