//! Serialized single-consumer runtime around an [`Engine`].
//!
//! Every producer funnels signals into one channel drained by a single worker
//! thread, so each command resolves atomically and in submission order. An
//! optional tick driver feeds `Tick` commands at a fixed cadence without ever
//! queueing more than one of them.
//!
//! Producers send while holding a read guard on the open flag; shutdown closes
//! the flag and enqueues its marker under the write guard, so every accepted
//! signal sits ahead of the marker and is resolved.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc, PoisonError, RwLock,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use motion_maze_core::{CellCoord, Command, Direction, GameSnapshot};
use tracing::{debug, info};

use crate::{Engine, EngineError};

enum Signal {
    Command(Command),
    Tick(Duration),
    Snapshot(Sender<GameSnapshot>),
    Shutdown,
}

/// Cloneable entry point used by input sources to enqueue signals.
#[derive(Clone, Debug)]
pub struct Submitter {
    sender: Sender<Signal>,
    open: Arc<RwLock<bool>>,
}

impl Submitter {
    /// Enqueues a command for resolution.
    pub fn submit(&self, command: Command) -> Result<(), EngineError> {
        self.send(Signal::Command(command))
    }

    /// Enqueues a movement signal.
    pub fn submit_movement(&self, direction: Direction) -> Result<(), EngineError> {
        self.submit(Command::Move { direction })
    }

    /// Enqueues a button press.
    pub fn submit_button_press(&self) -> Result<(), EngineError> {
        self.submit(Command::PressButton)
    }

    /// Enqueues a motion trigger.
    pub fn submit_motion_trigger(&self) -> Result<(), EngineError> {
        self.submit(Command::TriggerMotion)
    }

    /// Enqueues a pause request.
    pub fn submit_pause(&self) -> Result<(), EngineError> {
        self.submit(Command::Pause)
    }

    /// Enqueues a direct reposition of the player.
    pub fn submit_teleport(&self, cell: CellCoord) -> Result<(), EngineError> {
        self.submit(Command::Teleport { cell })
    }

    /// Requests a snapshot, answered by the worker between resolutions.
    pub fn snapshot(&self) -> Result<GameSnapshot, EngineError> {
        let (reply, response) = mpsc::channel();
        self.send(Signal::Snapshot(reply))?;
        response.recv().map_err(|_| EngineError::ShuttingDown)
    }

    fn send(&self, signal: Signal) -> Result<(), EngineError> {
        let open = self.open.read().unwrap_or_else(PoisonError::into_inner);
        if !*open {
            return Err(EngineError::ShuttingDown);
        }
        self.sender
            .send(signal)
            .map_err(|_| EngineError::ShuttingDown)
    }

    fn is_open(&self) -> bool {
        *self.open.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closes the gate and enqueues the shutdown marker as one step.
    fn close(&self) {
        let mut open = self.open.write().unwrap_or_else(PoisonError::into_inner);
        if *open {
            *open = false;
            let _ = self.sender.send(Signal::Shutdown);
        }
    }
}

/// Running engine owned by a worker thread.
#[derive(Debug)]
pub struct EngineHandle {
    submitter: Submitter,
    worker: JoinHandle<Engine>,
    ticker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Moves the engine onto a worker thread.
    ///
    /// When `tick_interval` is provided a driver thread submits `Tick` commands
    /// carrying the real elapsed time at that cadence.
    pub fn spawn(engine: Engine, tick_interval: Option<Duration>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let submitter = Submitter {
            sender,
            open: Arc::new(RwLock::new(true)),
        };
        let tick_pending = Arc::new(AtomicBool::new(false));

        let worker = {
            let tick_pending = Arc::clone(&tick_pending);
            thread::spawn(move || run_worker(engine, receiver, tick_pending))
        };

        let ticker = tick_interval.map(|interval| {
            let submitter = submitter.clone();
            thread::spawn(move || run_ticker(interval, &submitter, &tick_pending))
        });

        Self {
            submitter,
            worker,
            ticker,
        }
    }

    /// Cloneable submitter for input sources running on other threads.
    #[must_use]
    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    /// Enqueues a movement signal.
    pub fn submit_movement(&self, direction: Direction) -> Result<(), EngineError> {
        self.submitter.submit_movement(direction)
    }

    /// Enqueues a button press.
    pub fn submit_button_press(&self) -> Result<(), EngineError> {
        self.submitter.submit_button_press()
    }

    /// Enqueues a motion trigger.
    pub fn submit_motion_trigger(&self) -> Result<(), EngineError> {
        self.submitter.submit_motion_trigger()
    }

    /// Enqueues a pause request.
    pub fn submit_pause(&self) -> Result<(), EngineError> {
        self.submitter.submit_pause()
    }

    /// Enqueues a direct reposition of the player.
    pub fn submit_teleport(&self, cell: CellCoord) -> Result<(), EngineError> {
        self.submitter.submit_teleport(cell)
    }

    /// Pulls a snapshot of the committed state.
    pub fn snapshot(&self) -> Result<GameSnapshot, EngineError> {
        self.submitter.snapshot()
    }

    /// Stops accepting signals, drains what is queued and returns the engine.
    pub fn shutdown(self) -> Result<Engine, EngineError> {
        self.submitter.close();
        if let Some(ticker) = self.ticker {
            ticker.join().map_err(|_| EngineError::WorkerPanicked)?;
        }
        let engine = self.worker.join().map_err(|_| EngineError::WorkerPanicked)?;
        info!("engine_shutdown_complete");
        Ok(engine)
    }
}

fn run_worker(
    mut engine: Engine,
    receiver: Receiver<Signal>,
    tick_pending: Arc<AtomicBool>,
) -> Engine {
    info!("engine_worker_started");
    while let Ok(signal) = receiver.recv() {
        match signal {
            Signal::Command(command) => {
                debug!(?command, "command_received");
                let _ = engine.resolve(command);
            }
            Signal::Tick(dt) => {
                tick_pending.store(false, Ordering::Release);
                let _ = engine.resolve(Command::Tick { dt });
            }
            Signal::Snapshot(reply) => {
                let _ = reply.send(engine.snapshot());
            }
            Signal::Shutdown => break,
        }
    }
    info!("engine_worker_stopped");
    engine
}

fn run_ticker(interval: Duration, submitter: &Submitter, tick_pending: &AtomicBool) {
    let mut last = Instant::now();
    while submitter.is_open() {
        thread::sleep(interval);
        if tick_pending.swap(true, Ordering::AcqRel) {
            continue;
        }

        let now = Instant::now();
        let dt = now.duration_since(last);
        last = now;
        if submitter.send(Signal::Tick(dt)).is_err() {
            break;
        }
    }
}
