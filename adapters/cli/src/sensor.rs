//! Simulated motion sensor that injects random signals.

use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::Duration,
};

use motion_maze_core::Direction;
use motion_maze_engine::{EngineError, Submitter};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Signals the sensor can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SensorSignal {
    Move(Direction),
    Button,
    Motion,
}

impl SensorSignal {
    const ALL: [SensorSignal; 6] = [
        Self::Move(Direction::Up),
        Self::Move(Direction::Down),
        Self::Move(Direction::Left),
        Self::Move(Direction::Right),
        Self::Button,
        Self::Motion,
    ];

    fn submit(self, submitter: &Submitter) -> Result<(), EngineError> {
        match self {
            Self::Move(direction) => submitter.submit_movement(direction),
            Self::Button => submitter.submit_button_press(),
            Self::Motion => submitter.submit_motion_trigger(),
        }
    }
}

/// Random source deciding when and what the sensor fires.
#[derive(Debug)]
pub(crate) struct Sensor {
    rng: ChaCha8Rng,
    fire_chance: f64,
}

impl Sensor {
    /// `fire_chance` must lie in `0..=1`.
    pub(crate) fn new(seed: u64, fire_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fire_chance,
        }
    }

    /// Rolls once; returns the signal to emit, if any.
    pub(crate) fn poll(&mut self) -> Option<SensorSignal> {
        if !self.rng.gen_bool(self.fire_chance) {
            return None;
        }
        SensorSignal::ALL.choose(&mut self.rng).copied()
    }
}

/// Polls the sensor every `interval` until `stop` fires or disconnects.
pub(crate) fn spawn(
    mut sensor: Sensor,
    interval: Duration,
    submitter: Submitter,
    stop: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!(interval_ms = interval.as_millis() as u64, "sensor_started");
        loop {
            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            let Some(signal) = sensor.poll() else {
                continue;
            };
            debug!(?signal, "sensor_fired");
            if signal.submit(&submitter).is_err() {
                break;
            }
        }
        info!("sensor_stopped");
    })
}
