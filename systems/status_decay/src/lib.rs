#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stochastic expiry of player status effects.
//!
//! Every tick while playing, each active effect is rolled once and cleared
//! with a per-effect probability. Recorded expiry instants are advisory and
//! are not consulted.

use motion_maze_core::{Command, Event, GameStateKind, StatusEffect, StatusFlags};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Per-tick probability that `trapped` or `slowed` wears off.
pub const HINDRANCE_DECAY_CHANCE: f64 = 0.10;
/// Per-tick probability that `shielded` or `hastened` wears off.
pub const BOON_DECAY_CHANCE: f64 = 0.05;

/// Configuration parameters required to construct the decay system.
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

/// Pure system that emits clear commands for decaying status effects.
#[derive(Debug)]
pub struct StatusDecay {
    rng: ChaCha8Rng,
}

impl StatusDecay {
    /// Creates a new decay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes tick events and the player's status to emit clear commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameStateKind,
        status: StatusFlags,
        out: &mut Vec<Command>,
    ) {
        if state != GameStateKind::Playing {
            return;
        }

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        if ticks == 0 {
            return;
        }

        for effect in status.active() {
            let chance = decay_chance(effect);
            if (0..ticks).any(|_| self.rng.gen_bool(chance)) {
                out.push(Command::ClearStatus { effect });
            }
        }
    }
}

/// Per-tick clearing probability of the effect.
#[must_use]
pub const fn decay_chance(effect: StatusEffect) -> f64 {
    match effect {
        StatusEffect::Trapped | StatusEffect::Slowed => HINDRANCE_DECAY_CHANCE,
        StatusEffect::Shielded | StatusEffect::Hastened => BOON_DECAY_CHANCE,
    }
}
